//! Free-text editing round trip for `JobRequirements`.
//!
//! Grammar, one construct per line (surrounding whitespace ignored):
//! - a line ending in `:` opens a section; its key is the header lower-cased
//!   with spaces replaced by underscores (`Core Responsibilities:` →
//!   `core_responsibilities`)
//! - a line starting with `- ` is an item of the open section
//! - anything else, and items outside a known section, are skipped
//!
//! The screening-criteria block has no headers: every `- ` line is an item.

use serde::{Deserialize, Serialize};

use crate::screening::requirements::{
    GoodToHaveRequirements, JobRequirements, MustHaveRequirements,
};

/// The three editable text blocks shown to the user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditableRequirements {
    pub must_have: String,
    pub preferred: String,
    pub additional: String,
}

/// Renders requirements as header/item text blocks.
pub fn to_editable_text(req: &JobRequirements) -> EditableRequirements {
    let must = &req.must_have_requirements;
    let mut must_have = Vec::new();
    push_section(&mut must_have, "Technical Skills:", &must.technical_skills);
    push_section(
        &mut must_have,
        "\nExperience:",
        std::slice::from_ref(&must.experience),
    );
    push_section(&mut must_have, "\nQualifications:", &must.qualifications);
    push_section(
        &mut must_have,
        "\nCore Responsibilities:",
        &must.core_responsibilities,
    );

    let good = &req.good_to_have_requirements;
    let mut preferred = Vec::new();
    push_section(&mut preferred, "Additional Skills:", &good.additional_skills);
    push_section(
        &mut preferred,
        "\nExtra Qualifications:",
        &good.extra_qualifications,
    );
    push_section(&mut preferred, "\nBonus Experience:", &good.bonus_experience);

    let additional: Vec<String> = req
        .additional_screening_criteria
        .iter()
        .map(|c| format!("- {c}"))
        .collect();

    EditableRequirements {
        must_have: must_have.join("\n"),
        preferred: preferred.join("\n"),
        additional: additional.join("\n"),
    }
}

fn push_section(lines: &mut Vec<String>, header: &str, items: &[String]) {
    lines.push(header.to_string());
    lines.extend(items.iter().map(|item| format!("- {item}")));
}

/// Parses edited text blocks back into requirements.
///
/// Never fails: unrecognised lines are dropped and whatever was assembled is
/// returned. `original_job_description` is left empty for the caller to fill.
pub fn from_editable_text(
    must_have_text: &str,
    preferred_text: &str,
    additional_text: &str,
) -> JobRequirements {
    let mut must = MustHaveRequirements::default();
    for_each_item(must_have_text, |section, item| match section {
        "technical_skills" => must.technical_skills.push(item.to_string()),
        "qualifications" => must.qualifications.push(item.to_string()),
        "core_responsibilities" => must.core_responsibilities.push(item.to_string()),
        // Scalar: last line wins. A doubled bullet ("- - 3 years") is unwrapped once.
        "experience" => {
            must.experience = item
                .strip_prefix("- ")
                .map(str::trim)
                .unwrap_or(item)
                .to_string();
        }
        _ => {}
    });

    let mut good = GoodToHaveRequirements::default();
    for_each_item(preferred_text, |section, item| match section {
        "additional_skills" => good.additional_skills.push(item.to_string()),
        "extra_qualifications" => good.extra_qualifications.push(item.to_string()),
        "bonus_experience" => good.bonus_experience.push(item.to_string()),
        _ => {}
    });

    let additional_screening_criteria = additional_text
        .lines()
        .filter_map(|line| line.trim().strip_prefix("- "))
        .map(|item| item.trim().to_string())
        .collect();

    JobRequirements {
        original_job_description: String::new(),
        must_have_requirements: must,
        good_to_have_requirements: good,
        additional_screening_criteria,
    }
}

/// Walks `text`, calling `on_item(section_key, item)` for every item line
/// under an open section.
fn for_each_item(text: &str, mut on_item: impl FnMut(&str, &str)) {
    let mut current: Option<String> = None;
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        // Item lines win over headers so an item ending in ':' stays an item.
        if let Some(item) = line.strip_prefix("- ") {
            if let Some(section) = current.as_deref() {
                on_item(section, item.trim());
            }
        } else if let Some(header) = line.strip_suffix(':') {
            current = Some(header.to_lowercase().replace(' ', "_"));
        }
    }
}
