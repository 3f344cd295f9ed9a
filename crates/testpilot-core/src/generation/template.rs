//! Offline, deterministic generation backend.

use std::{fmt::Write, time::Duration};

use async_trait::async_trait;
use log::debug;

use super::{
    plan::{parse_scenarios, render_plan, scenario_id, strip_number, Scenario},
    spec_filename, CodeRequest, GeneratedCode, GeneratedFile, GenerationBackend, PlanRequest,
    TestPlan,
};
use crate::{error::Result, models::TestLanguage};

const DEFAULT_PRECONDITION: &str = "The application is reachable at the base URL";

/// Template engine producing plans from user stories and Playwright specs
/// from plans.
///
/// Output depends only on the request, so the same input always yields the
/// same plan and code. An optional latency simulates a remote backend.
#[derive(Debug, Clone, Default)]
pub struct TemplateBackend {
    latency: Duration,
}

impl TemplateBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays every response by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[async_trait]
impl GenerationBackend for TemplateBackend {
    fn name(&self) -> &str {
        "template"
    }

    async fn synthesize_plan(&self, request: &PlanRequest) -> Result<TestPlan> {
        self.simulate_latency().await;

        let scenarios = scenarios_from_story(&request.title, &request.description);
        debug!("template plan for '{}': {} scenarios", request.title, scenarios.len());

        Ok(TestPlan {
            plan_markdown: render_plan(&request.title, &scenarios),
            scenario_count: u32::try_from(scenarios.len()).unwrap_or(u32::MAX),
        })
    }

    async fn synthesize_code(&self, request: &CodeRequest) -> Result<GeneratedCode> {
        self.simulate_latency().await;

        let mut scenarios = parse_scenarios(&request.plan);
        if scenarios.is_empty() {
            scenarios.push(happy_path(&request.title, &request.title));
        }

        let content = render_spec(request, &scenarios);
        Ok(GeneratedCode {
            files: vec![GeneratedFile {
                filename: spec_filename(&request.title, request.language),
                content,
            }],
            scenario_count: u32::try_from(scenarios.len()).unwrap_or(u32::MAX),
        })
    }
}

/// One scenario per acceptance criterion, or a single happy path when the
/// story lists none.
fn scenarios_from_story(title: &str, description: &str) -> Vec<Scenario> {
    let criteria = acceptance_criteria(description);
    if criteria.is_empty() {
        let goal = story_goal(description).unwrap_or_else(|| title.to_string());
        return vec![happy_path(title, &goal)];
    }

    criteria
        .into_iter()
        .enumerate()
        .map(|(index, criterion)| Scenario {
            id: Some(scenario_id(index + 1)),
            name: capitalize(&criterion),
            preconditions: Some(DEFAULT_PRECONDITION.to_string()),
            steps: vec![
                "Navigate to the application".to_string(),
                format!("Exercise the behavior: {criterion}"),
                "Observe the result".to_string(),
            ],
            expected: Some(capitalize(&criterion)),
        })
        .collect()
}

fn happy_path(title: &str, goal: &str) -> Scenario {
    Scenario {
        id: Some(scenario_id(1)),
        name: format!("Successful {}", title.to_lowercase()),
        preconditions: Some(DEFAULT_PRECONDITION.to_string()),
        steps: vec![
            "Navigate to the application".to_string(),
            format!("Complete the flow: {goal}"),
            "Observe the result".to_string(),
        ],
        expected: Some(format!("{title} completes without errors")),
    }
}

/// List items under an "Acceptance Criteria" heading, or every list item when
/// no such heading exists.
fn acceptance_criteria(description: &str) -> Vec<String> {
    let lines: Vec<&str> = description.lines().collect();
    let section = lines
        .iter()
        .position(|line| line.to_lowercase().contains("acceptance criteria"))
        .map_or(&lines[..], |start| &lines[start + 1..]);

    section
        .iter()
        .filter_map(|line| list_item(line.trim()))
        .map(|item| item.trim_end_matches('.').trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

fn list_item(line: &str) -> Option<&str> {
    let item = ["- ", "* ", "• "]
        .iter()
        .find_map(|bullet| line.strip_prefix(bullet))
        .or_else(|| strip_number(line))?;

    let item = item.trim();
    Some(
        ["[ ]", "[x]", "[X]"]
            .iter()
            .find_map(|checkbox| item.strip_prefix(checkbox))
            .unwrap_or(item)
            .trim(),
    )
}

/// The "I want to ..." clause of a user story.
fn story_goal(description: &str) -> Option<String> {
    let lower = description.to_lowercase();
    let marker = ["i want to ", "i want "]
        .iter()
        .find_map(|m| lower.find(m).map(|at| at + m.len()))?;

    // Byte offsets from the lowercased copy only line up for ASCII text.
    if !description.is_ascii() {
        return None;
    }
    let rest = &description[marker..];
    let end = [" so that", ".", "\n", ","]
        .iter()
        .filter_map(|stop| rest.find(stop))
        .min()
        .unwrap_or(rest.len());
    let goal = rest[..end].trim();
    (!goal.is_empty()).then(|| goal.to_string())
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Escapes text for a single-quoted JavaScript string literal.
fn js_string(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace(['\n', '\r'], " ")
}

fn render_spec(request: &CodeRequest, scenarios: &[Scenario]) -> String {
    let mut out = String::new();
    match request.language {
        TestLanguage::TypeScript => {
            out.push_str("import { test, expect } from '@playwright/test';\n\n");
        }
        TestLanguage::JavaScript => {
            out.push_str("// @ts-check\nconst { test, expect } = require('@playwright/test');\n\n");
        }
    }

    let _ = writeln!(out, "test.describe('{}', () => {{", js_string(&request.title));
    out.push_str("  test.beforeEach(async ({ page }) => {\n");
    let _ = writeln!(out, "    await page.goto('{}');", js_string(&request.base_url));
    out.push_str("  });\n");

    for scenario in scenarios {
        let test_name = scenario.expected.as_deref().unwrap_or(&scenario.name);

        let _ = writeln!(out, "\n  test.describe('{}', () => {{", js_string(&scenario.heading()));
        let _ = writeln!(out, "    test('{}', async ({{ page }}) => {{", js_string(test_name));
        if let Some(pre) = &scenario.preconditions {
            let _ = writeln!(out, "      // Preconditions: {}", pre.replace('\n', " "));
        }
        for step in &scenario.steps {
            let _ = writeln!(out, "      await test.step('{}', async () => {{", js_string(step));
            out.push_str("        await expect(page.locator('body')).toBeVisible();\n");
            out.push_str("      });\n");
        }
        out.push_str("      await expect(page).toHaveURL(/.+/);\n");
        out.push_str("    });\n");
        out.push_str("  });\n");
    }

    out.push_str("});\n");
    out
}
