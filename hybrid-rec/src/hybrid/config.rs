use displaydoc::Display;
use thiserror::Error;

/// The configuration of the hybrid blending.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    alpha: f32,
    collaborative_breadth: usize,
    content_breadth: usize,
}

/// Potential errors of the hybrid configuration.
#[derive(Copy, Clone, Debug, Display, Error, PartialEq)]
pub enum Error {
    /// Invalid blend weight, expected value in the unit interval
    Alpha,
    /// Invalid number of candidates, expected positive value
    Breadth,
}

impl Config {
    /// The weight of the collaborative scores, the content scores get `1 - alpha`.
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Sets the weight of the collaborative scores.
    ///
    /// # Errors
    /// Fails if alpha is not within `[0, 1]`.
    pub fn with_alpha(self, alpha: f32) -> Result<Self, Error> {
        if (0. ..=1.).contains(&alpha) {
            Ok(Self { alpha, ..self })
        } else {
            Err(Error::Alpha)
        }
    }

    /// The maximum number of collaborative candidates.
    pub fn collaborative_breadth(&self) -> usize {
        self.collaborative_breadth
    }

    /// Sets the maximum number of collaborative candidates.
    ///
    /// # Errors
    /// Fails if the breadth is zero.
    pub fn with_collaborative_breadth(self, collaborative_breadth: usize) -> Result<Self, Error> {
        if collaborative_breadth > 0 {
            Ok(Self {
                collaborative_breadth,
                ..self
            })
        } else {
            Err(Error::Breadth)
        }
    }

    /// The number of similar items fetched per rated item.
    pub fn content_breadth(&self) -> usize {
        self.content_breadth
    }

    /// Sets the number of similar items fetched per rated item.
    ///
    /// # Errors
    /// Fails if the breadth is zero.
    pub fn with_content_breadth(self, content_breadth: usize) -> Result<Self, Error> {
        if content_breadth > 0 {
            Ok(Self {
                content_breadth,
                ..self
            })
        } else {
            Err(Error::Breadth)
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            alpha: 0.7,
            collaborative_breadth: 100,
            content_breadth: 20,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(0.)]
    #[case(0.5)]
    #[case(1.)]
    fn test_alpha(#[case] alpha: f32) {
        assert_eq!(Config::default().with_alpha(alpha).unwrap().alpha(), alpha);
    }

    #[rstest]
    #[case(-0.1)]
    #[case(1.1)]
    #[case(f32::NAN)]
    fn test_alpha_invalid(#[case] alpha: f32) {
        assert_eq!(Config::default().with_alpha(alpha).unwrap_err(), Error::Alpha);
    }

    #[test]
    fn test_breadth() {
        let config = Config::default()
            .with_collaborative_breadth(5)
            .unwrap()
            .with_content_breadth(3)
            .unwrap();
        assert_eq!(config.collaborative_breadth(), 5);
        assert_eq!(config.content_breadth(), 3);
        assert_eq!(
            Config::default().with_collaborative_breadth(0).unwrap_err(),
            Error::Breadth,
        );
        assert_eq!(
            Config::default().with_content_breadth(0).unwrap_err(),
            Error::Breadth,
        );
    }
}
