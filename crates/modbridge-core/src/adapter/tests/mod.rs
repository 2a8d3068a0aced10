// Adapter test module; fixtures are shared with the facade and kernel tests
#[cfg(test)]
pub(crate) mod fixtures;
#[cfg(test)]
mod registry_tests;
