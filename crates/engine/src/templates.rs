// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Template renderer (§4.10): a minimal `{{var_name}}` substitution engine
//! over four built-in templates. This is deliberately not a general
//! templating engine — no loops, no conditionals — the real renderer lives
//! outside the core; this is just enough to make the core runnable.

use std::collections::HashMap;

/// Which built-in template to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    InitialTask,
    ResumeTask,
    StatusCheck,
    Review,
}

impl TemplateKind {
    fn source(self) -> &'static str {
        match self {
            TemplateKind::InitialTask => INITIAL_TASK_TEMPLATE,
            TemplateKind::ResumeTask => RESUME_TASK_TEMPLATE,
            TemplateKind::StatusCheck => STATUS_CHECK_TEMPLATE,
            TemplateKind::Review => REVIEW_TEMPLATE,
        }
    }
}

const INITIAL_TASK_TEMPLATE: &str = "\
You are working in the project `{{project_name}}`. Your task list lives at \
`{{doc_path}}` (full path: `{{full_doc_path}}`). Work through the unchecked \
checkboxes in that document from top to bottom, checking each one off as you \
complete it. When you reach a checkpoint, report your status by POSTing to \
{{callback_url}} with your task id `{{task_id}}`.";

const RESUME_TASK_TEMPLATE: &str = "\
You are resuming task `{{task_id}}` in the project `{{project_name}}`. Read \
`{{full_doc_path}}` and continue from the first unchecked checkbox — do not \
repeat work already checked off. Report status to {{callback_url}}.";

const STATUS_CHECK_TEMPLATE: &str = "\
Before continuing, report your current status (in_progress / completed / \
failed) and an estimate of remaining context by POSTing to {{callback_url}} \
with task id `{{task_id}}`.";

const REVIEW_TEMPLATE: &str = "\
You are reviewing the work recorded in `{{full_doc_path}}` for project \
`{{project_name}}` (task `{{task_id}}`), performed by a different CLI ({{cli_type}}). \
Verify each checked-off item is actually complete and correct; report findings \
and your status to {{callback_url}}.";

/// Renders one of the four built-in templates by substituting `{{var_name}}`
/// placeholders. A trait so the daemon can swap in a richer renderer without
/// the engine depending on it directly.
pub trait TemplateRenderer: Send + Sync {
    fn render(&self, kind: TemplateKind, vars: &HashMap<String, String>) -> String;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultTemplateRenderer;

impl TemplateRenderer for DefaultTemplateRenderer {
    fn render(&self, kind: TemplateKind, vars: &HashMap<String, String>) -> String {
        substitute(kind.source(), vars)
    }
}

fn substitute(template: &str, vars: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];
        match after_open.find("}}") {
            Some(end) => {
                let name = after_open[..end].trim();
                match vars.get(name) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push_str("{{");
                        out.push_str(name);
                        out.push_str("}}");
                    }
                }
                rest = &after_open[end + 2..];
            }
            None => {
                out.push_str("{{");
                rest = after_open;
                break;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
#[path = "templates_tests.rs"]
mod tests;
