#[cfg(test)]
mod task_tests;
