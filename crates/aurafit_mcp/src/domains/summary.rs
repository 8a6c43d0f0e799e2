//! Section splitting for the narrative summary.
//!
//! Only used for presentation. Nothing here may feed numbers or decisions
//! back into the log.

use std::sync::LazyLock;

use regex::Regex;
use schemars::JsonSchema;
use serde::Serialize;

static HEADING: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*###[ \t]+(.+?)[ \t\r]*$").ok());

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Report,
    Analysis,
    Tip,
    Other,
}

impl SectionKind {
    fn classify(heading: &str) -> Self {
        let h = heading.to_lowercase();
        if h.contains("report") {
            SectionKind::Report
        } else if h.contains("analysis") {
            SectionKind::Analysis
        } else if h.contains("tip") {
            SectionKind::Tip
        } else {
            SectionKind::Other
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, JsonSchema)]
pub struct SummarySection {
    pub kind: SectionKind,
    /// Empty for text that precedes the first heading.
    pub heading: String,
    pub body: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, JsonSchema)]
pub struct SummarySections {
    pub sections: Vec<SummarySection>,
}

impl SummarySections {
    pub fn parse(text: &str) -> Self {
        let mut sections = Vec::new();
        let mut cursor = 0;
        let mut pending: Option<String> = None;

        let captures = HEADING.iter().flat_map(|re| re.captures_iter(text));
        for caps in captures {
            let (Some(whole), Some(title)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            push_section(&mut sections, pending.take(), &text[cursor..whole.start()]);
            pending = Some(title.as_str().to_string());
            cursor = whole.end();
        }
        push_section(&mut sections, pending, &text[cursor..]);

        Self { sections }
    }

    pub fn get(&self, kind: SectionKind) -> Option<&SummarySection> {
        self.sections.iter().find(|s| s.kind == kind)
    }

    pub fn has_all_standard_sections(&self) -> bool {
        [SectionKind::Report, SectionKind::Analysis, SectionKind::Tip]
            .into_iter()
            .all(|k| self.get(k).is_some())
    }
}

fn push_section(sections: &mut Vec<SummarySection>, heading: Option<String>, body: &str) {
    let body = body.trim().to_string();
    match heading {
        Some(heading) => sections.push(SummarySection {
            kind: SectionKind::classify(&heading),
            heading,
            body,
        }),
        None if !body.is_empty() => sections.push(SummarySection {
            kind: SectionKind::Other,
            heading: String::new(),
            body,
        }),
        None => {}
    }
}
