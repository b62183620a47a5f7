//! Reset-code generation utilities.

use rand::Rng;

/// Configuration for reset-code generation.
#[derive(Debug, Clone)]
pub struct CodeConfig {
    /// Number of digits in the code.
    pub length: u32,
}

impl Default for CodeConfig {
    fn default() -> Self {
        Self { length: 6 }
    }
}

impl CodeConfig {
    /// Creates a new code config with the specified digit count.
    ///
    /// The length is clamped to 1..=9 so the code range fits in a u32.
    pub fn new(length: u32) -> Self {
        Self {
            length: length.clamp(1, 9),
        }
    }
}

/// Generates uniformly random numeric reset codes.
///
/// Codes are drawn from the full `10^(n-1)..10^n` range, so a 6-digit
/// code is always in `100000..=999999` and never carries a leading zero.
#[derive(Debug, Clone)]
pub struct CodeGenerator {
    config: CodeConfig,
}

impl CodeGenerator {
    /// Creates a new generator with the given config.
    pub fn new(config: CodeConfig) -> Self {
        Self { config }
    }

    /// Generates a new reset code.
    pub fn generate(&self) -> String {
        let mut rng = rand::thread_rng();
        let low = 10u32.pow(self.config.length - 1);
        let high = 10u32.pow(self.config.length);
        rng.gen_range(low..high).to_string()
    }

    /// Returns the configured code length.
    pub fn length(&self) -> u32 {
        self.config.length
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new(CodeConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_six_digit_code() {
        let generator = CodeGenerator::default();
        let code = generator.generate();

        assert_eq!(code.len(), 6);
        assert!(code.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_no_leading_zero() {
        let generator = CodeGenerator::default();
        for _ in 0..200 {
            let code = generator.generate();
            assert!(!code.starts_with('0'));
        }
    }

    #[test]
    fn test_custom_length() {
        let generator = CodeGenerator::new(CodeConfig::new(4));
        let code = generator.generate();
        assert_eq!(code.len(), 4);
    }

    #[test]
    fn test_length_clamped() {
        let config = CodeConfig::new(40);
        assert_eq!(config.length, 9);
    }

    #[test]
    fn test_spread() {
        let generator = CodeGenerator::default();
        let codes: Vec<String> = (0..100).map(|_| generator.generate()).collect();

        // Check that we get some variety (not all the same)
        let unique_count = codes.iter().collect::<std::collections::HashSet<_>>().len();
        assert!(unique_count > 90);
    }
}
