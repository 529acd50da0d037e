//! Watermark overlay for unentitled exports
//!
//! Each paginated backend has its own [`WatermarkStamper`]: the PDF encoder
//! stamps every page as it is finalized, the DOCX encoder gives every
//! section a footer. Stamps are collected in a [`WatermarkStage`] and only
//! applied when every page or section was stamped successfully. A failed
//! stamp drops the whole watermark instead of failing the export.

use crate::error::WatermarkError;
use tracing::warn;

/// Text of the watermark notice
pub const WATERMARK_NOTICE: &str =
    "Generated with BookCraft AI — purchase credits to remove this watermark";

/// Produces the watermark for one page or section
pub trait WatermarkStamper {
    /// What gets stamped (a finished page, a document section)
    type Target;

    /// The backend-specific stamp
    type Stamp;

    /// Stamp the `index`-th target
    fn stamp(&self, target: &Self::Target, index: usize) -> Result<Self::Stamp, WatermarkError>;
}

/// Check a notice before any stamper uses it
pub fn validate_notice(notice: &str) -> Result<(), WatermarkError> {
    if notice.trim().is_empty() {
        return Err(WatermarkError::InvalidNotice("notice is empty".to_string()));
    }
    if let Some(c) = notice.chars().find(|c| c.is_control()) {
        return Err(WatermarkError::InvalidNotice(format!(
            "control character U+{:04X}",
            c as u32
        )));
    }
    Ok(())
}

/// Stamps gathered so far; committed all at once or not at all
pub struct WatermarkStage<'a, S: WatermarkStamper> {
    stamper: &'a S,
    stamps: Vec<S::Stamp>,
    failure: Option<WatermarkError>,
}

impl<'a, S: WatermarkStamper> WatermarkStage<'a, S> {
    pub fn new(stamper: &'a S) -> Self {
        Self {
            stamper,
            stamps: Vec::new(),
            failure: None,
        }
    }

    /// Stamp the next target. After a failure further targets are skipped.
    pub fn stamp(&mut self, target: &S::Target) {
        if self.failure.is_some() {
            return;
        }
        match self.stamper.stamp(target, self.stamps.len()) {
            Ok(stamp) => self.stamps.push(stamp),
            Err(err) => self.failure = Some(err),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.failure.is_some()
    }

    /// All stamps in target order, or `None` if any stamp failed
    pub fn commit(self) -> Option<Vec<S::Stamp>> {
        match self.failure {
            None => Some(self.stamps),
            Some(err) => {
                warn!(error = %err, "Watermark stamping failed, exporting without watermark");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EvenOnly;

    impl WatermarkStamper for EvenOnly {
        type Target = u32;
        type Stamp = String;

        fn stamp(&self, target: &u32, index: usize) -> Result<String, WatermarkError> {
            if target % 2 == 0 {
                Ok(format!("{}:{}", index, target))
            } else {
                Err(WatermarkError::NoRoom { page: index })
            }
        }
    }

    #[test]
    fn test_commit_when_all_succeed() {
        let stamper = EvenOnly;
        let mut stage = WatermarkStage::new(&stamper);
        for page in [2, 4, 6] {
            stage.stamp(&page);
        }
        assert_eq!(
            stage.commit(),
            Some(vec!["0:2".to_string(), "1:4".to_string(), "2:6".to_string()])
        );
    }

    #[test]
    fn test_single_failure_drops_everything() {
        let stamper = EvenOnly;
        let mut stage = WatermarkStage::new(&stamper);
        for page in [2, 3, 4] {
            stage.stamp(&page);
        }
        assert!(stage.is_failed());
        assert_eq!(stage.commit(), None);
    }

    #[test]
    fn test_validate_notice() {
        assert!(validate_notice(WATERMARK_NOTICE).is_ok());
        assert!(matches!(validate_notice("  "), Err(WatermarkError::InvalidNotice(_))));
        assert!(validate_notice("bad\u{7}bell").is_err());
    }
}
