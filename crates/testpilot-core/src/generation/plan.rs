//! Markdown test plan structure.
//!
//! Plans are numbered lists of scenarios:
//!
//! ```text
//! ## Test Plan: Checkout Flow
//!
//! ### Test Scenarios:
//!
//! 1. **TC001: Successful checkout flow**
//!    - Preconditions: User has items in the cart
//!    - Steps:
//!      1. Open the cart
//!      2. Submit the order
//!    - Expected Result: The order confirmation is shown
//! ```
//!
//! Operators edit plans freely, so parsing is lenient: any numbered line
//! starting at column zero opens a scenario, and the detail bullets are
//! optional.

use std::fmt::Write;

/// One scenario from a test plan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scenario {
    /// Identifier such as `TC001`, when the heading carries one
    pub id: Option<String>,
    pub name: String,
    pub preconditions: Option<String>,
    pub steps: Vec<String>,
    pub expected: Option<String>,
}

impl Scenario {
    /// Heading text, `TC001: name` or just `name`.
    pub fn heading(&self) -> String {
        match &self.id {
            Some(id) => format!("{id}: {}", self.name),
            None => self.name.clone(),
        }
    }
}

/// Scenario identifier for a 1-based position, e.g. `TC004`.
pub fn scenario_id(position: usize) -> String {
    format!("TC{position:03}")
}

/// Splits `"12. rest"` into `rest`, for any run of leading digits.
pub(crate) fn strip_number(line: &str) -> Option<&str> {
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let rest = &line[digits..];
    let rest = rest.strip_prefix('.').or_else(|| rest.strip_prefix(')'))?;
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some(rest.trim())
}

fn parse_heading(text: &str) -> Scenario {
    let text = text.trim().trim_matches('*').trim();
    let (id, name) = match text.split_once(':') {
        Some((id, name)) if is_scenario_id(id.trim()) => {
            (Some(id.trim().to_string()), name.trim().to_string())
        }
        _ => (None, text.to_string()),
    };
    Scenario {
        id,
        name,
        ..Default::default()
    }
}

fn is_scenario_id(candidate: &str) -> bool {
    candidate
        .strip_prefix("TC")
        .is_some_and(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
}

fn labelled<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    let rest = line.strip_prefix("- ")?.trim_start();
    let rest = rest.strip_prefix(label)?;
    Some(rest.strip_prefix(':').unwrap_or(rest).trim())
}

/// Extracts every numbered scenario from a plan.
///
/// ```rust
/// use testpilot_core::generation::parse_scenarios;
///
/// let plan = "## Test Plan: Login\n\n1. **TC001: Valid login**\n2. **Locked account**\n";
/// let scenarios = parse_scenarios(plan);
/// assert_eq!(scenarios.len(), 2);
/// assert_eq!(scenarios[0].id.as_deref(), Some("TC001"));
/// assert_eq!(scenarios[1].name, "Locked account");
/// ```
pub fn parse_scenarios(markdown: &str) -> Vec<Scenario> {
    let mut scenarios: Vec<Scenario> = Vec::new();
    let mut in_steps = false;

    for line in markdown.lines() {
        let indented = line.starts_with(char::is_whitespace);
        let trimmed = line.trim();

        if !indented {
            if let Some(heading) = strip_number(trimmed) {
                if !heading.is_empty() {
                    scenarios.push(parse_heading(heading));
                }
                in_steps = false;
            }
            continue;
        }

        let Some(current) = scenarios.last_mut() else {
            continue;
        };

        if let Some(value) = labelled(trimmed, "Preconditions") {
            current.preconditions = Some(value.to_string()).filter(|v| !v.is_empty());
            in_steps = false;
        } else if labelled(trimmed, "Steps").is_some() {
            in_steps = true;
        } else if let Some(value) = labelled(trimmed, "Expected Result") {
            current.expected = Some(value.to_string()).filter(|v| !v.is_empty());
            in_steps = false;
        } else if in_steps {
            if let Some(step) = strip_number(trimmed).or_else(|| trimmed.strip_prefix("- ")) {
                if !step.is_empty() {
                    current.steps.push(step.to_string());
                }
            }
        }
    }

    scenarios
}

/// Number of scenarios in a plan.
pub fn count_scenarios(markdown: &str) -> u32 {
    u32::try_from(parse_scenarios(markdown).len()).unwrap_or(u32::MAX)
}

/// Renders scenarios as plan markdown.
pub fn render_plan(title: &str, scenarios: &[Scenario]) -> String {
    let mut out = format!("## Test Plan: {title}\n\n### Test Scenarios:\n");

    for (index, scenario) in scenarios.iter().enumerate() {
        let _ = write!(out, "\n{}. **{}**\n", index + 1, scenario.heading());
        if let Some(pre) = &scenario.preconditions {
            let _ = writeln!(out, "   - Preconditions: {pre}");
        }
        if !scenario.steps.is_empty() {
            out.push_str("   - Steps:\n");
            for (n, step) in scenario.steps.iter().enumerate() {
                let _ = writeln!(out, "     {}. {step}", n + 1);
            }
        }
        if let Some(expected) = &scenario.expected {
            let _ = writeln!(out, "   - Expected Result: {expected}");
        }
    }

    out
}
