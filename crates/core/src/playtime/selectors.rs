//! Versioned selector sets for extracting estimates from search-page markup.
//!
//! Selectors are a small CSS subset: whitespace-separated descendant steps,
//! each a tag name and/or `.class` / `#id` parts (`div.result h3 a`).

use anyhow::{anyhow, bail, Result};
use select::{document::Document, node::Node, predicate::Predicate};
use serde::{Deserialize, Serialize};

use crate::{
    config::ScraperConfig,
    models::{parse_hours, PlaytimeEstimate},
};

/// Raw selector strings as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorStrings {
    /// Label used in logs.
    pub version: String,
    /// One search result.
    pub result: String,
    /// Title link inside a result.
    pub title: String,
    /// Main story duration inside a result.
    pub main: String,
    /// Main plus extras duration inside a result.
    pub main_extra: String,
    /// Completionist duration inside a result.
    pub completionist: String,
}

impl SelectorStrings {
    /// Built-in selector set for `version`.
    pub fn builtin(version: &str) -> Option<Self> {
        match version {
            "v1" => Some(Self {
                version: "v1".to_string(),
                result: ".search_list_tidbit".to_string(),
                title: ".search_list_title a".to_string(),
                main: ".search_list_tidbit_short".to_string(),
                main_extra: ".search_list_tidbit_main".to_string(),
                completionist: ".search_list_tidbit_completionist".to_string(),
            }),
            _ => None,
        }
    }
}

/// One compound step of a selector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Step {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

impl Step {
    fn parse(token: &str) -> Result<Self> {
        if token
            .chars()
            .any(|c| matches!(c, '>' | '+' | '~' | '[' | ']' | ':' | ',' | '*'))
        {
            bail!("unsupported selector syntax `{token}`");
        }

        let mut step = Step::default();
        let mut rest = token;
        let tag_end = rest.find(['.', '#']).unwrap_or(rest.len());
        if tag_end > 0 {
            step.tag = Some(rest[..tag_end].to_ascii_lowercase());
        }
        rest = &rest[tag_end..];

        while let Some(marker) = rest.chars().next() {
            let body = &rest[1..];
            let end = body.find(['.', '#']).unwrap_or(body.len());
            let name = &body[..end];
            if name.is_empty() {
                bail!("empty name in selector `{token}`");
            }
            match marker {
                '.' => step.classes.push(name.to_string()),
                _ => step.id = Some(name.to_string()),
            }
            rest = &body[end..];
        }

        Ok(step)
    }
}

impl Predicate for Step {
    fn matches(&self, node: &Node) -> bool {
        let Some(name) = node.name() else {
            return false;
        };
        if let Some(tag) = &self.tag {
            if !name.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if node.attr("id") != Some(id.as_str()) {
                return false;
            }
        }
        let classes = node.attr("class").unwrap_or_default();
        self.classes
            .iter()
            .all(|wanted| classes.split_whitespace().any(|class| class == wanted))
    }
}

/// A parsed descendant-chain selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    steps: Vec<Step>,
}

impl Selector {
    /// Parse a selector string.
    pub fn parse(source: &str) -> Result<Self> {
        let steps = source
            .split_whitespace()
            .map(Step::parse)
            .collect::<Result<Vec<_>>>()?;
        if steps.is_empty() {
            bail!("empty selector");
        }
        Ok(Self {
            source: source.trim().to_string(),
            steps,
        })
    }

    /// The selector as written, usable as CSS.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// First match anywhere in `document`.
    pub fn first_in<'a>(&self, document: &'a Document) -> Option<Node<'a>> {
        let (first, rest) = self.steps.split_first()?;
        let roots: Vec<Node<'a>> = document.find(first.clone()).collect();
        descend(roots, rest).into_iter().next()
    }

    /// First match below `node`.
    pub fn first_below<'a>(&self, node: Node<'a>) -> Option<Node<'a>> {
        descend(vec![node], &self.steps).into_iter().next()
    }
}

fn descend<'a>(mut nodes: Vec<Node<'a>>, steps: &[Step]) -> Vec<Node<'a>> {
    for step in steps {
        nodes = nodes
            .iter()
            .flat_map(|node| node.find(step.clone()))
            .collect();
        if nodes.is_empty() {
            break;
        }
    }
    nodes
}

/// A complete, parsed selector set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorSet {
    version: String,
    result: Selector,
    title: Selector,
    main: Selector,
    main_extra: Selector,
    completionist: Selector,
}

impl SelectorSet {
    /// Parse a set of selector strings.
    pub fn parse(strings: &SelectorStrings) -> Result<Self> {
        let parse = |field: &str, value: &str| {
            Selector::parse(value)
                .map_err(|err| anyhow!("selector `{field}` of set {}: {err}", strings.version))
        };
        Ok(Self {
            version: strings.version.clone(),
            result: parse("result", &strings.result)?,
            title: parse("title", &strings.title)?,
            main: parse("main", &strings.main)?,
            main_extra: parse("main_extra", &strings.main_extra)?,
            completionist: parse("completionist", &strings.completionist)?,
        })
    }

    /// Custom selectors from configuration, or the named built-in set.
    pub fn from_config(config: &ScraperConfig) -> Result<Self> {
        match &config.selectors {
            Some(custom) => Self::parse(custom),
            None => {
                let builtin = SelectorStrings::builtin(&config.selector_version).ok_or_else(
                    || anyhow!("unknown selector version `{}`", config.selector_version),
                )?;
                Self::parse(&builtin)
            }
        }
    }

    /// Version label.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Selector that signals results have rendered.
    pub fn result(&self) -> &Selector {
        &self.result
    }

    /// Extract the first result from rendered markup.
    pub fn extract(&self, html: &str) -> Option<PlaytimeEstimate> {
        let document = Document::from(html);
        let result = self.result.first_in(&document)?;
        let text = |selector: &Selector| {
            selector
                .first_below(result)
                .map(|node| node.text().trim().to_string())
                .filter(|text| !text.is_empty())
        };

        Some(PlaytimeEstimate {
            name: text(&self.title),
            main: text(&self.main).as_deref().and_then(parse_hours),
            main_extra: text(&self.main_extra).as_deref().and_then(parse_hours),
            completionist: text(&self.completionist).as_deref().and_then(parse_hours),
        })
    }
}
