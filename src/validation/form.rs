use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};

use super::{
    dates, money,
    rules::{self, DateRule, EntityKind, FieldKind, FieldRule},
    sanitize_identifier, MIN_ID_LEN, TIME_PATTERN,
};
use crate::errors::{FieldErrors, ServiceError};
use crate::models::flexible_date;

/// Raw field values of one entity form plus their inline errors.
///
/// Input-time sanitisation drops invalid keystrokes, blur-time correction
/// clamps out-of-range values, and submission is blocked while any error or
/// missing required field remains.
#[derive(Debug, Clone)]
pub struct FormState {
    entity: EntityKind,
    values: BTreeMap<&'static str, String>,
    errors: BTreeMap<&'static str, String>,
    locked: BTreeSet<&'static str>,
    /// Date fields checked for format only; their range rule is not applied.
    unbounded: BTreeSet<&'static str>,
}

impl FormState {
    pub fn new(entity: EntityKind) -> Self {
        Self {
            entity,
            values: BTreeMap::new(),
            errors: BTreeMap::new(),
            locked: BTreeSet::new(),
            unbounded: BTreeSet::new(),
        }
    }

    pub fn entity(&self) -> EntityKind {
        self.entity
    }

    fn rule(&self, field: &str) -> Result<&'static FieldRule, ServiceError> {
        rules::rule(self.entity, field).ok_or_else(|| {
            ServiceError::BadRequest(format!("{} form has no field '{}'", self.entity, field))
        })
    }

    /// Prefills a field without validating it (edit forms, defaults).
    pub fn prefill(&mut self, field: &str, value: impl Into<String>) -> Result<(), ServiceError> {
        let rule = self.rule(field)?;
        self.values.insert(rule.field, value.into());
        Ok(())
    }

    /// Marks a field read-only; identifiers are immutable once created.
    pub fn lock(&mut self, field: &str) -> Result<(), ServiceError> {
        let rule = self.rule(field)?;
        self.locked.insert(rule.field);
        Ok(())
    }

    pub fn is_locked(&self, field: &str) -> bool {
        self.locked.contains(field)
    }

    /// Drops the range rule of a date field, e.g. for a stored record whose
    /// date was only bounded when it was created.
    pub fn unbound_date(&mut self, field: &str) -> Result<(), ServiceError> {
        let rule = self.rule(field)?;
        if !matches!(rule.kind, FieldKind::Date(_)) {
            return Err(ServiceError::BadRequest(format!(
                "{} is not a date field",
                rule.label
            )));
        }
        self.unbounded.insert(rule.field);
        Ok(())
    }

    /// Keystroke handler: sanitises, stores and re-checks the field.
    pub fn input(&mut self, field: &str, raw: &str, today: NaiveDate) -> Result<(), ServiceError> {
        let rule = self.rule(field)?;
        if self.locked.contains(rule.field) {
            return Err(ServiceError::BadRequest(format!(
                "{} cannot be changed",
                rule.label
            )));
        }
        let value = sanitize(&rule.kind, raw);
        self.values.insert(rule.field, value);
        self.check(rule, today);
        Ok(())
    }

    /// Focus-out handler: clamps the stored value into range, then re-checks.
    pub fn blur(&mut self, field: &str, today: NaiveDate) -> Result<(), ServiceError> {
        let rule = self.rule(field)?;
        let unbounded = self.unbounded.contains(rule.field);
        if let Some(current) = self.values.get(rule.field).cloned() {
            let corrected = if unbounded {
                flexible_date::parse(&current).map(|date| date.format("%Y-%m-%d").to_string())
            } else {
                correct(&rule.kind, &current, today)
            };
            if let Some(corrected) = corrected {
                if corrected != current {
                    tracing::debug!(field = rule.field, from = %current, to = %corrected, "clamped field");
                    self.values.insert(rule.field, corrected);
                }
            }
        }
        self.check(rule, today);
        Ok(())
    }

    /// `input` followed by `blur`, as when a value is entered in one go.
    pub fn enter(&mut self, field: &str, raw: &str, today: NaiveDate) -> Result<(), ServiceError> {
        self.input(field, raw, today)?;
        self.blur(field, today)
    }

    pub fn value(&self, field: &str) -> &str {
        self.values.get(field).map(String::as_str).unwrap_or("")
    }

    pub fn opt_value(&self, field: &str) -> Option<String> {
        let value = self.value(field).trim();
        (!value.is_empty()).then(|| value.to_string())
    }

    pub fn money(&self, field: &str) -> Option<Decimal> {
        money::parse_money(self.value(field))
    }

    pub fn quantity(&self, field: &str) -> Option<u32> {
        self.value(field).trim().parse().ok()
    }

    pub fn date(&self, field: &str) -> Option<NaiveDate> {
        flexible_date::parse(self.value(field))
    }

    pub fn hours(&self, field: &str) -> Option<f64> {
        self.value(field).trim().parse::<f64>().ok().filter(|h| h.is_finite())
    }

    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn errors(&self) -> &BTreeMap<&'static str, String> {
        &self.errors
    }

    /// Records a cross-field error (e.g. reserved above on hand).
    pub fn set_error(&mut self, field: &str, message: impl Into<String>) -> Result<(), ServiceError> {
        let rule = self.rule(field)?;
        self.errors.insert(rule.field, message.into());
        Ok(())
    }

    pub fn clear_error(&mut self, field: &str) {
        self.errors.remove(field);
    }

    /// Re-checks one field against its rule without touching its value.
    pub fn revalidate(&mut self, field: &str, today: NaiveDate) -> Result<(), ServiceError> {
        let rule = self.rule(field)?;
        self.check(rule, today);
        Ok(())
    }

    /// Checks every declared field; returns whether the form may be submitted.
    pub fn validate_all(&mut self, today: NaiveDate) -> bool {
        for rule in rules::rules_for(self.entity) {
            self.check(rule, today);
        }
        self.can_submit()
    }

    /// Submission gate: no inline errors and every required field filled.
    pub fn can_submit(&self) -> bool {
        self.errors.is_empty()
            && rules::rules_for(self.entity)
                .iter()
                .filter(|rule| rule.required)
                .all(|rule| !self.value(rule.field).trim().is_empty())
    }

    /// Converts the inline errors into a single all-or-nothing failure.
    pub fn ensure_valid(&mut self, today: NaiveDate) -> Result<(), ServiceError> {
        self.validate_all(today);
        self.check_submittable()
    }

    /// Like [`ensure_valid`](Self::ensure_valid) without re-running the
    /// per-field checks, so cross-field errors set by the caller survive.
    pub fn check_submittable(&self) -> Result<(), ServiceError> {
        if self.can_submit() {
            return Ok(());
        }
        let fields: FieldErrors = self
            .errors
            .iter()
            .map(|(field, message)| (field.to_string(), message.clone()))
            .collect();
        Err(ServiceError::InvalidFields(fields))
    }

    fn check(&mut self, rule: &FieldRule, today: NaiveDate) {
        let outcome = if self.unbounded.contains(rule.field) {
            check_date_format(rule, self.value(rule.field))
        } else {
            check_value(rule, self.value(rule.field), today)
        };
        match outcome {
            Some(message) => {
                self.errors.insert(rule.field, message);
            }
            None => {
                self.errors.remove(rule.field);
            }
        }
    }
}

fn sanitize(kind: &FieldKind, raw: &str) -> String {
    match kind {
        FieldKind::Identifier => sanitize_identifier(raw),
        FieldKind::Money { .. } => money::sanitize_money_input(raw),
        FieldKind::Quantity { .. } => raw.chars().filter(char::is_ascii_digit).collect(),
        FieldKind::Hours { .. } => {
            let mut seen_point = false;
            raw.chars()
                .filter(|c| match c {
                    '0'..='9' => true,
                    '.' if !seen_point => {
                        seen_point = true;
                        true
                    }
                    _ => false,
                })
                .collect()
        }
        FieldKind::Phone => raw
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '+')
            .collect(),
        _ => raw.to_string(),
    }
}

fn correct(kind: &FieldKind, current: &str, today: NaiveDate) -> Option<String> {
    match kind {
        FieldKind::Money { min, max } => money::parse_money(current)
            .map(|value| money::clamp_money(value, *min, *max).to_string()),
        FieldKind::Quantity { .. } => current.trim().parse::<u32>().ok().map(|q| q.to_string()),
        FieldKind::Hours { min, max, step } => {
            let hours = current.trim().parse::<f64>().ok().filter(|h| h.is_finite())?;
            let snapped = ((hours.clamp(*min, *max) / step).floor() * step).max(*min);
            Some(format_hours(snapped))
        }
        FieldKind::Date(rule) => {
            let date = flexible_date::parse(current)?;
            let corrected = match rule {
                DateRule::NotBeforeToday => dates::clamp_not_before(date, today),
                DateRule::TrailingWindow { days } => {
                    date.clamp(today - chrono::Duration::days(*days), today)
                }
                DateRule::WorkingAge => dates::clamp_birth_date(date, today),
            };
            Some(corrected.format("%Y-%m-%d").to_string())
        }
        FieldKind::Choice(options) => options
            .iter()
            .find(|option| option.eq_ignore_ascii_case(&crate::models::normalize_label(current)))
            .cloned(),
        FieldKind::Text | FieldKind::Email => Some(current.trim().to_string()),
        _ => None,
    }
}

fn format_hours(hours: f64) -> String {
    if hours.fract() == 0.0 {
        format!("{hours:.0}")
    } else {
        format!("{hours:.1}")
    }
}

fn check_date_format(rule: &FieldRule, raw: &str) -> Option<String> {
    let value = raw.trim();
    if value.is_empty() {
        return rule.required.then(|| format!("{} is required", rule.label));
    }
    flexible_date::parse(value)
        .is_none()
        .then(|| format!("{} must be a date (YYYY-MM-DD)", rule.label))
}

/// Inline error for a raw value, or `None` when it satisfies its rule.
pub fn check_value(rule: &FieldRule, raw: &str, today: NaiveDate) -> Option<String> {
    let value = raw.trim();
    if value.is_empty() {
        return rule.required.then(|| format!("{} is required", rule.label));
    }

    match &rule.kind {
        FieldKind::Identifier => {
            if value.chars().count() < MIN_ID_LEN {
                Some(format!(
                    "{} must be at least {} characters",
                    rule.label, MIN_ID_LEN
                ))
            } else if !super::is_valid_identifier(value) {
                Some(format!(
                    "{} may only contain letters, digits, '-' and '_'",
                    rule.label
                ))
            } else {
                None
            }
        }
        FieldKind::Text => None,
        FieldKind::Email => (!validator::validate_email(value))
            .then(|| format!("{} must be a valid email address", rule.label)),
        FieldKind::Phone => {
            let digits = value.chars().filter(char::is_ascii_digit).count();
            (!(10..=15).contains(&digits))
                .then(|| format!("{} must have 10 to 15 digits", rule.label))
        }
        FieldKind::Money { min, max } => match money::parse_money(value) {
            None => Some(format!("{} must be a valid number", rule.label)),
            Some(amount) if amount < *min || amount > *max => Some(format!(
                "{} must be between {} and {}",
                rule.label,
                money::format_money(*min),
                money::format_money(*max)
            )),
            Some(_) => None,
        },
        FieldKind::Quantity { min } => match value.parse::<u32>() {
            Err(_) => Some(format!("{} must be a whole number", rule.label)),
            Ok(qty) if qty < *min => Some(format!("{} must be at least {}", rule.label, min)),
            Ok(_) => None,
        },
        FieldKind::Hours { min, max, step } => match value.parse::<f64>() {
            Ok(hours) if hours.is_finite() => {
                if hours < *min || hours > *max {
                    Some(format!(
                        "{} must be between {} and {}",
                        rule.label,
                        format_hours(*min),
                        format_hours(*max)
                    ))
                } else if ((hours / step).round() * step - hours).abs() > f64::EPSILON {
                    Some(format!(
                        "{} must be in steps of {}",
                        rule.label,
                        format_hours(*step)
                    ))
                } else {
                    None
                }
            }
            _ => Some(format!("{} must be a number", rule.label)),
        },
        FieldKind::Date(date_rule) => {
            let Some(date) = flexible_date::parse(value) else {
                return Some(format!("{} must be a date (YYYY-MM-DD)", rule.label));
            };
            match date_rule {
                DateRule::NotBeforeToday if date < today => {
                    Some(format!("{} cannot be in the past", rule.label))
                }
                DateRule::TrailingWindow { days }
                    if date > today || date < today - chrono::Duration::days(*days) =>
                {
                    Some(format!(
                        "{} must be within the last {} days",
                        rule.label, days
                    ))
                }
                DateRule::WorkingAge if !dates::is_working_age(date, today) => Some(format!(
                    "Age must be between {} and {}",
                    dates::MIN_WORKER_AGE,
                    dates::MAX_WORKER_AGE
                )),
                _ => None,
            }
        }
        FieldKind::Time => (!TIME_PATTERN.is_match(value))
            .then(|| format!("{} must be HH:MM", rule.label)),
        FieldKind::Choice(options) => {
            let normalized = crate::models::normalize_label(value);
            (!options.iter().any(|o| o.eq_ignore_ascii_case(&normalized)))
                .then(|| format!("{} must be one of: {}", rule.label, options.join(", ")))
        }
    }
}
