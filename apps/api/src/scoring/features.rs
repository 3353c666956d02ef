//! Rule-based feature extractors: skill coverage, education and experience adequacy.
//!
//! All three treat the first argument as the requirement (job text) and the second
//! as the candidate (resume text); they are deliberately asymmetric. Matching is by
//! substring on normalized text, so "java" also hits inside "javascript".

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::scoring::fallback::{
    EDUCATION_NO_REQUIREMENT, EXPERIENCE_NO_REQUIREMENT, SKILLS_NO_REQUIREMENT,
};
use crate::scoring::vocabulary::Vocabulary;

static RE_YEARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(\d+)\+?\s*years?").unwrap());

/// Resume within this fraction of the required education level counts as a near miss.
const EDUCATION_NEAR_MISS_RATIO: f64 = 0.8;
const EDUCATION_NEAR_MISS_SCORE: f64 = 0.8;
const EDUCATION_FLOOR: f64 = 0.6;

const EXPERIENCE_NEAR_MISS_RATIO: f64 = 0.7;
const EXPERIENCE_NEAR_MISS_SCORE: f64 = 0.85;
const EXPERIENCE_FLOOR: f64 = 0.5;

// ────────────────────────────────────────────────────────────────────────────
// Skills
// ────────────────────────────────────────────────────────────────────────────

/// Vocabulary skills present in `text`, with their configured weights.
pub fn extract_skills<'v>(text: &str, vocabulary: &'v Vocabulary) -> BTreeMap<&'v str, f64> {
    vocabulary
        .skills
        .iter()
        .filter(|(skill, _)| text.contains(skill.as_str()))
        .map(|(skill, &weight)| (skill.as_str(), weight))
        .collect()
}

/// Weighted share of the job's skills that the resume also mentions.
pub fn skill_coverage(jd: &str, resume: &str, vocabulary: &Vocabulary) -> f64 {
    let jd_skills = extract_skills(jd, vocabulary);
    if jd_skills.is_empty() {
        return SKILLS_NO_REQUIREMENT;
    }
    let resume_skills = extract_skills(resume, vocabulary);

    let total: f64 = jd_skills.values().sum();
    let matched: f64 = jd_skills
        .iter()
        .filter(|(skill, _)| resume_skills.contains_key(*skill))
        .map(|(_, weight)| weight)
        .sum();

    if total > 0.0 {
        (matched / total).min(1.0)
    } else {
        SKILLS_NO_REQUIREMENT
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Education
// ────────────────────────────────────────────────────────────────────────────

/// Highest education level mentioned in `text`, or 0.0 when none is.
pub fn education_level(text: &str, vocabulary: &Vocabulary) -> f64 {
    vocabulary
        .education
        .iter()
        .filter(|(keyword, _)| text.contains(keyword.as_str()))
        .map(|(_, &level)| level)
        .fold(0.0, f64::max)
}

pub fn education_adequacy(jd: &str, resume: &str, vocabulary: &Vocabulary) -> f64 {
    let required = education_level(jd, vocabulary);
    if required == 0.0 {
        return EDUCATION_NO_REQUIREMENT;
    }
    let held = education_level(resume, vocabulary);

    if held >= required {
        1.0
    } else if held >= required * EDUCATION_NEAR_MISS_RATIO {
        EDUCATION_NEAR_MISS_SCORE
    } else {
        EDUCATION_FLOOR
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Experience
// ────────────────────────────────────────────────────────────────────────────

/// Largest "<n>(+) year(s)" figure in `text`, or 0 when there is none.
/// Figures too large for `u64` saturate rather than being dropped.
pub fn extract_years(text: &str) -> u64 {
    RE_YEARS
        .captures_iter(text)
        // the capture is all digits, so overflow is the only parse failure
        .map(|caps| caps[1].parse::<u64>().unwrap_or(u64::MAX))
        .max()
        .unwrap_or(0)
}

pub fn experience_adequacy(jd: &str, resume: &str) -> f64 {
    let required = extract_years(jd);
    if required == 0 {
        return EXPERIENCE_NO_REQUIREMENT;
    }
    let required = required as f64;
    let held = extract_years(resume) as f64;

    if held >= required {
        1.0
    } else if held >= required * EXPERIENCE_NEAR_MISS_RATIO {
        EXPERIENCE_NEAR_MISS_SCORE
    } else {
        (held / required).max(EXPERIENCE_FLOOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::normalize::normalize;

    fn vocab() -> Vocabulary {
        Vocabulary::default()
    }

    #[test]
    fn extract_skills_matches_substrings() {
        let v = vocab();
        let skills = extract_skills("senior javascript developer", &v);
        // "java" inside "javascript" is an accepted false positive
        assert!(skills.contains_key("javascript"));
        assert!(skills.contains_key("java"));
        assert_eq!(skills["javascript"], 2.0);
    }

    #[test]
    fn skill_coverage_without_jd_skills_is_neutral() {
        let v = vocab();
        assert_eq!(
            skill_coverage("friendly barista wanted", "python sql", &v),
            SKILLS_NO_REQUIREMENT
        );
    }

    #[test]
    fn skill_coverage_is_weighted() {
        let v = vocab();
        // jd: python(2.0) + docker(1.8) + git(1.5) = 5.3; resume covers python + git
        let score = skill_coverage("python docker git", "python git", &v);
        assert!((score - 3.5 / 5.3).abs() < 1e-12, "got {score}");
    }

    #[test]
    fn full_skill_coverage_is_one() {
        let v = vocab();
        assert_eq!(skill_coverage("python sql", "sql python docker", &v), 1.0);
    }

    #[test]
    fn resume_without_skills_scores_zero_coverage() {
        let v = vocab();
        assert_eq!(skill_coverage("kubernetes", "gardening", &v), 0.0);
    }

    #[test]
    fn education_level_takes_the_maximum() {
        let v = vocab();
        assert_eq!(education_level("bsc then masters then mba", &v), 2.5);
        assert_eq!(education_level("self taught", &v), 0.0);
    }

    #[test]
    fn phd_required_bachelor_held_hits_the_floor() {
        let v = vocab();
        let jd = normalize("PhD required");
        let resume = normalize("Bachelor's degree");
        assert_eq!(education_level(&jd, &v), 3.0);
        assert_eq!(education_level(&resume, &v), 2.0);
        assert_eq!(education_adequacy(&jd, &resume, &v), 0.6);
    }

    #[test]
    fn education_near_miss_band() {
        let v = vocab();
        // required 3.0, held 2.5 >= 2.4
        assert_eq!(education_adequacy("phd", "masters", &v), 0.8);
    }

    #[test]
    fn education_meets_or_exceeds() {
        let v = vocab();
        assert_eq!(education_adequacy("bachelor", "phd", &v), 1.0);
        assert_eq!(education_adequacy("bsc", "btech", &v), 1.0);
    }

    #[test]
    fn education_without_requirement_gives_benefit_of_doubt() {
        let v = vocab();
        assert_eq!(
            education_adequacy("rust engineer", "no degree", &v),
            EDUCATION_NO_REQUIREMENT
        );
    }

    #[test]
    fn extract_years_takes_the_maximum() {
        assert_eq!(extract_years("3 years at acme, 5+ years overall, 1 year abroad"), 5);
        assert_eq!(extract_years("10years"), 10);
        assert_eq!(extract_years("no numbers here"), 0);
    }

    #[test]
    fn extract_years_is_case_insensitive() {
        assert_eq!(extract_years("7 YEARS"), 7);
    }

    #[test]
    fn extract_years_saturates_oversized_figures() {
        assert_eq!(extract_years("99999999999999999999 years, 4 years"), u64::MAX);
        assert_eq!(extract_years("5000000000 years"), 5_000_000_000);
    }

    #[test]
    fn oversized_requirement_is_still_a_requirement() {
        assert_eq!(experience_adequacy("5000000000 years", "1 year"), EXPERIENCE_FLOOR);
        assert_eq!(experience_adequacy("1 year", "99999999999999999999 years"), 1.0);
    }

    #[test]
    fn experience_below_tolerance_is_proportional() {
        let jd = normalize("5+ years experience");
        let resume = normalize("3 years experience");
        let score = experience_adequacy(&jd, &resume);
        assert!((score - 0.6).abs() < 1e-12, "got {score}");
    }

    #[test]
    fn experience_near_miss_band() {
        // 4 >= 5 * 0.7
        assert_eq!(experience_adequacy("5 years", "4 years"), 0.85);
    }

    #[test]
    fn experience_floor_is_half() {
        assert_eq!(experience_adequacy("10 years", "1 year"), 0.5);
        assert_eq!(experience_adequacy("10 years", "fresh graduate"), 0.5);
    }

    #[test]
    fn experience_meets_requirement() {
        assert_eq!(experience_adequacy("3 years", "8 years"), 1.0);
    }

    #[test]
    fn experience_without_requirement_ignores_resume() {
        assert_eq!(
            experience_adequacy("backend engineer", "7 years"),
            EXPERIENCE_NO_REQUIREMENT
        );
    }

    #[test]
    fn requirement_side_is_asymmetric() {
        assert_eq!(experience_adequacy("8 years", "2 years"), 0.5);
        assert_eq!(experience_adequacy("2 years", "8 years"), 1.0);
    }
}
