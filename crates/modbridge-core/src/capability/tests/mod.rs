#[cfg(test)]
mod probe_tests;
#[cfg(test)]
mod version_tests;
