//! Downward-only score calibration from a verified external profile

use crate::config::CalibrationConfig;
use crate::processing::pattern::SkillRegistry;
use crate::processing::profile::ExternalSkillProfile;
use log::debug;
use std::collections::BTreeSet;
use std::sync::Arc;

pub struct ProfileCalibrator {
    registry: Arc<SkillRegistry>,
    config: CalibrationConfig,
}

impl ProfileCalibrator {
    pub fn new(registry: Arc<SkillRegistry>, config: CalibrationConfig) -> Self {
        Self { registry, config }
    }

    /// Adjust `base` (0-100) using the profile's verified strong skills. The
    /// result never exceeds `base`.
    pub fn calibrate<I>(&self, profile: &ExternalSkillProfile, jd_skills: I, base: u8) -> u8
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let jd: BTreeSet<String> = jd_skills
            .into_iter()
            .map(|s| self.registry.canonicalize(s.as_ref()))
            .filter(|s| !s.is_empty())
            .collect();
        if jd.is_empty() {
            return base;
        }

        let strong: BTreeSet<String> = profile
            .strong_skills
            .iter()
            .map(|s| self.registry.canonicalize(s))
            .collect();
        let strong_ratio = jd.intersection(&strong).count() as f64 / jd.len() as f64;

        let mut adjusted = f64::from(base);
        if !profile.generally_related {
            adjusted = adjusted.min(self.config.unrelated_cap);
        }
        if strong_ratio < self.config.low_strong_ratio && adjusted > self.config.low_strong_cap {
            adjusted = self.config.low_strong_cap;
        }

        let calibrated = adjusted.clamp(0.0, 100.0).round() as u8;
        let calibrated = calibrated.min(base);
        if calibrated != base {
            debug!(
                "Calibrated score {} -> {} (strong ratio {:.2}, related {})",
                base, calibrated, strong_ratio, profile.generally_related
            );
        }
        calibrated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DetectionConfig;

    fn profile(strong: &[&str], related: bool) -> ExternalSkillProfile {
        ExternalSkillProfile {
            strong_skills: strong.iter().map(|s| s.to_string()).collect(),
            generally_related: related,
            ..ExternalSkillProfile::default()
        }
    }

    fn calibrator() -> ProfileCalibrator {
        let registry = SkillRegistry::new(DetectionConfig::default()).unwrap();
        ProfileCalibrator::new(Arc::new(registry), CalibrationConfig::default())
    }

    #[test]
    fn test_unrelated_profile_is_capped() {
        let jd = ["java", "sql"];
        assert_eq!(calibrator().calibrate(&profile(&["java", "sql"], false), jd, 90), 35);
        assert_eq!(calibrator().calibrate(&profile(&["java", "sql"], false), jd, 20), 20);
    }

    #[test]
    fn test_low_strong_coverage_is_capped() {
        let jd = ["java", "sql", "docker", "aws"];
        assert_eq!(calibrator().calibrate(&profile(&["java"], true), jd, 90), 75);
        assert_eq!(calibrator().calibrate(&profile(&["java", "sql"], true), jd, 90), 90);
    }

    #[test]
    fn test_synonym_claims_count_as_canonical_skills() {
        let jd = ["go", "node.js", "docker", "aws"];
        assert_eq!(calibrator().calibrate(&profile(&["golang", "Node JS"], true), jd, 90), 90);
        assert_eq!(calibrator().calibrate(&profile(&["golang"], true), jd, 90), 75);
    }

    #[test]
    fn test_empty_jd_keeps_base() {
        assert_eq!(calibrator().calibrate(&profile(&[], false), Vec::<String>::new(), 80), 80);
    }

    #[test]
    fn test_calibration_never_increases() {
        let jd = ["java", "spring boot", "sql"];
        let profiles = [
            profile(&[], false),
            profile(&[], true),
            profile(&["java"], true),
            profile(&["java", "spring boot", "sql"], false),
        ];
        for p in &profiles {
            for base in [0u8, 20, 35, 40, 67, 75, 76, 90, 100] {
                assert!(calibrator().calibrate(p, jd, base) <= base);
            }
        }
    }
}
