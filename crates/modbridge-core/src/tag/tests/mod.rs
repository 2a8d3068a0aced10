// Tag codec test module
#[cfg(test)]
mod codec_tests;
