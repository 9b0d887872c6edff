// Field rules gating outbound article requests

use crate::models::{Article, ArticleUpdate};

pub const TITLE_MAX_LEN: usize = 100;
pub const SUMMARY_MAX_LEN: usize = 255;

const ID_PRESENT: &str = "Article id shouldn't be present";
const TITLE_MISSING: &str = "Title should be populated";
const TITLE_LENGTH: &str = "Title length must be between 1 and 100";
const SUMMARY_LENGTH: &str = "Summary length shouldn't be greater than 255";
const TEXT_MISSING: &str = "Text should be populated";
const TEXT_LENGTH: &str = "Text length should be 1 at least";
const AUTHOR_MISSING: &str = "Author should be populated";
const DATE_CREATED_PRESENT: &str = "DateCreated shouldn't be populated";
const DATE_UPDATED_PRESENT: &str = "DateUpdated shouldn't be populated";

/// Validate an article about to be created.
///
/// Returns every violated rule, in field order.
pub fn validate_new_article(article: &Article) -> Result<(), Vec<String>> {
    let mut violations = Vec::new();

    if article.id.is_some() {
        violations.push(ID_PRESENT.to_string());
    }

    match article.title.as_deref() {
        None => violations.push(TITLE_MISSING.to_string()),
        Some(title) => check_title(title, &mut violations),
    }

    if let Some(summary) = article.summary.as_deref() {
        check_summary(summary, &mut violations);
    }

    match article.text.as_deref() {
        None => violations.push(TEXT_MISSING.to_string()),
        Some(text) => check_text(text, &mut violations),
    }

    if article.author.as_deref().map_or(true, str::is_empty) {
        violations.push(AUTHOR_MISSING.to_string());
    }

    if article.date_created.is_some() {
        violations.push(DATE_CREATED_PRESENT.to_string());
    }
    if article.date_updated.is_some() {
        violations.push(DATE_UPDATED_PRESENT.to_string());
    }

    into_result(violations)
}

/// Validate a partial update. Only present fields are checked.
pub fn validate_update(update: &ArticleUpdate) -> Result<(), Vec<String>> {
    let mut violations = Vec::new();

    if let Some(title) = update.title.as_deref() {
        check_title(title, &mut violations);
    }
    if let Some(summary) = update.summary.as_deref() {
        check_summary(summary, &mut violations);
    }
    if let Some(text) = update.text.as_deref() {
        check_text(text, &mut violations);
    }

    into_result(violations)
}

fn check_title(title: &str, violations: &mut Vec<String>) {
    let len = title.chars().count();
    if !(1..=TITLE_MAX_LEN).contains(&len) {
        violations.push(TITLE_LENGTH.to_string());
    }
}

fn check_summary(summary: &str, violations: &mut Vec<String>) {
    if summary.chars().count() > SUMMARY_MAX_LEN {
        violations.push(SUMMARY_LENGTH.to_string());
    }
}

fn check_text(text: &str, violations: &mut Vec<String>) {
    if text.is_empty() {
        violations.push(TEXT_LENGTH.to_string());
    }
}

fn into_result(violations: Vec<String>) -> Result<(), Vec<String>> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}
