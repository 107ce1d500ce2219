//! Age and gender rules attached to vaccine criteria rows.
//!
//! Age criteria are free-text values such as `"2 months"`, `"6-59 months"`,
//! `"10-11 years"` or `"65+ years"`. A missing value matches every age; a value
//! that does not follow one of those shapes matches nobody.

use std::str::FromStr;

use chrono::NaiveDate;

use shared_models::domain::{Gender, VaccineCriteria};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserAge {
    pub years: i64,
    pub months: i64,
}

impl UserAge {
    /// Whole years are counted as 365 days and whole months as 30 days.
    pub fn on(date_of_birth: NaiveDate, today: NaiveDate) -> Self {
        let days = (today - date_of_birth).num_days();
        Self {
            years: days.div_euclid(365),
            months: days.div_euclid(30),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeCriterion {
    ExactMonths(i64),
    MonthRange(i64, i64),
    YearRange(i64, i64),
    YearsAndOver(i64),
}

impl AgeCriterion {
    pub fn matches(&self, age: UserAge) -> bool {
        match *self {
            AgeCriterion::ExactMonths(n) => age.months == n,
            AgeCriterion::MonthRange(lo, hi) => (lo..=hi).contains(&age.months),
            AgeCriterion::YearRange(lo, hi) => (lo..=hi).contains(&age.years),
            AgeCriterion::YearsAndOver(n) => age.years >= n,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAgeCriterion(pub String);

fn parse_range(value: &str) -> Option<(i64, i64)> {
    let (lo, hi) = value.split_once('-')?;
    Some((lo.trim().parse().ok()?, hi.trim().parse().ok()?))
}

impl FromStr for AgeCriterion {
    type Err = UnknownAgeCriterion;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let unknown = || UnknownAgeCriterion(value.to_string());
        let (amount, unit) = value.trim().split_once(' ').ok_or_else(unknown)?;

        match unit.trim() {
            "months" => {
                if amount.contains('-') {
                    let (lo, hi) = parse_range(amount).ok_or_else(unknown)?;
                    Ok(AgeCriterion::MonthRange(lo, hi))
                } else {
                    amount.parse().map(AgeCriterion::ExactMonths).map_err(|_| unknown())
                }
            }
            "years" => {
                if let Some(n) = amount.strip_suffix('+') {
                    n.parse().map(AgeCriterion::YearsAndOver).map_err(|_| unknown())
                } else {
                    let (lo, hi) = parse_range(amount).ok_or_else(unknown)?;
                    Ok(AgeCriterion::YearRange(lo, hi))
                }
            }
            _ => Err(unknown()),
        }
    }
}

pub fn age_matches(criterion: Option<&str>, age: UserAge) -> bool {
    match criterion {
        None => true,
        Some(value) => value
            .parse::<AgeCriterion>()
            .map(|c| c.matches(age))
            .unwrap_or(false),
    }
}

pub fn gender_matches(criterion: Option<&str>, gender: Gender) -> bool {
    match criterion.map(str::trim) {
        None | Some("") | Some("None") => true,
        Some(code) => code == gender.code(),
    }
}

pub fn criteria_matches(criteria: &VaccineCriteria, age: UserAge, gender: Gender) -> bool {
    age_matches(criteria.age_criteria.as_deref(), age)
        && gender_matches(criteria.gender_criteria.as_deref(), gender)
}
