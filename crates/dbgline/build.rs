use std::env;

const BUILD_VARIABLES: [&str; 2] = ["DBGLINE_LEVEL", "DBGLINE_MAX_LENGTH"];

fn main() {
    for name in BUILD_VARIABLES {
        println!("cargo:rerun-if-env-changed={name}");

        if let Ok(value) = env::var(name) {
            let trimmed = value.trim();
            if trimmed.is_empty() || !trimmed.bytes().all(|byte| byte.is_ascii_digit()) {
                panic!("{name} must be an unsigned decimal integer, found {value:?}");
            }
            if trimmed.parse::<u32>().is_err() {
                panic!("{name} does not fit in 32 bits: {value:?}");
            }
        }
    }
}
