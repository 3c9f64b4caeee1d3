use std::fmt::{Debug, Display, Formatter};

/// Percentage already scaled to `0..=100`.
pub struct FormattedPercentage(pub f64);

impl Debug for FormattedPercentage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for FormattedPercentage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}%", self.0)
    }
}

/// Optional value which renders as a dash when missing.
pub struct FormattedOption<T>(pub Option<T>);

impl<T: Display> Display for FormattedOption<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Some(value) => Display::fmt(value, f),
            None => write!(f, "—"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_ok() {
        assert_eq!(FormattedPercentage(33.333).to_string(), "33.3%");
    }

    #[test]
    fn option_ok() {
        assert_eq!(FormattedOption(Some(1)).to_string(), "1");
        assert_eq!(FormattedOption::<i32>(None).to_string(), "—");
    }
}
