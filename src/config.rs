use std::env;
use std::fmt::Debug;
use std::str::FromStr;

/// Returns the value of the named environment variable if it exists or panics.
pub fn get_variable(name: &str) -> String {
    env::var(name).unwrap_or_else(|_| panic!("must define {} environment variable", name))
}

/// Parses the named environment variable, falling back to `default`
/// when it is not set. Panics if it is set but cannot be parsed.
pub fn get_variable_or<T>(name: &str, default: T) -> T
where
    T: FromStr,
    T::Err: Debug,
{
    match env::var(name) {
        Ok(value) => value
            .parse()
            .unwrap_or_else(|e| panic!("parse {} environment variable: {:?}", name, e)),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::get_variable_or;

    #[test]
    fn missing_variables_use_the_default() {
        assert_eq!(
            get_variable_or::<usize>("SHELTER_TEST_SURELY_UNSET_VARIABLE", 2),
            2
        );
    }

    #[test]
    #[should_panic(expected = "must define")]
    fn missing_required_variables_panic() {
        super::get_variable("SHELTER_TEST_SURELY_UNSET_VARIABLE");
    }
}
