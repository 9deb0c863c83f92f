//! Listing and fetching tags, enhanced tags and sessions.
//!
//! The three collections share one flow and differ only in their endpoint
//! and how a document is rendered, which [`Document`] captures.

use serde::de::DeserializeOwned;
use std::io::Write;

use crate::{
    args::{first_flag, parse_flags},
    client::{escape_path_segment, UserCollection},
    commands::documents::list_command,
    commands::params::{
        COMMAND_GET, COMMAND_LIST, PARAMETER_END_DATE, PARAMETER_NEXT_TOKEN, PARAMETER_START_DATE,
    },
    error::CliError,
    format::{dashes, first_non_empty, truncate, write_raw_json, LIST_RULE_WIDTH, RULE_WIDTH},
    model::{EnhancedTagModel, MultiDocumentResponse, SessionModel, TagModel},
};

const LABEL_WIDTH: usize = 60;

/// A user-collection document type with list and single renderings.
pub trait Document: DeserializeOwned {
    const ENDPOINT: &'static str;
    /// Heading of a list, e.g. `Tags`.
    const PLURAL: &'static str;
    /// Heading of a single document, e.g. `Tag`.
    const SINGULAR: &'static str;
    /// Line printed for an empty list.
    const EMPTY: &'static str;

    fn list_row(&self) -> String;
    fn render_fields(&self) -> String;
}

impl Document for TagModel {
    const ENDPOINT: &'static str = "/tag";
    const PLURAL: &'static str = "Tags";
    const SINGULAR: &'static str = "Tag";
    const EMPTY: &'static str = "No tags";

    fn list_row(&self) -> String {
        let label = if self.text.is_empty() {
            self.tags.join(",")
        } else {
            self.text.clone()
        };
        format!("{}  {}  {}", self.id, self.day, truncate(&label, LABEL_WIDTH))
    }

    fn render_fields(&self) -> String {
        let mut text = format!("ID:        {}\nDay:       {}\n", self.id, self.day);
        if !self.timestamp.is_empty() {
            text.push_str(&format!("Timestamp: {}\n", self.timestamp));
        }
        if !self.text.is_empty() {
            text.push_str(&format!("Text:      {}\n", self.text));
        }
        if !self.tags.is_empty() {
            text.push_str(&format!("Tags:      {}\n", self.tags.join(", ")));
        }
        text
    }
}

impl Document for EnhancedTagModel {
    const ENDPOINT: &'static str = "/enhanced_tag";
    const PLURAL: &'static str = "Enhanced tags";
    const SINGULAR: &'static str = "Enhanced tag";
    const EMPTY: &'static str = "No enhanced tags";

    fn list_row(&self) -> String {
        let days = if !self.end_day.is_empty() && self.end_day != self.start_day {
            format!("{}..{}", self.start_day, self.end_day)
        } else {
            self.start_day.clone()
        };
        let label = first_non_empty(&[
            self.custom_name.as_str(),
            self.comment.as_str(),
            self.tag_type_code.as_str(),
        ]);
        format!("{}  {}  {}", self.id, days, truncate(label, LABEL_WIDTH))
    }

    fn render_fields(&self) -> String {
        let mut text = format!("ID:        {}\n", self.id);
        for (label, value) in [
            ("Type:      ", &self.tag_type_code),
            ("Start day: ", &self.start_day),
            ("End day:   ", &self.end_day),
            ("Start:     ", &self.start_time),
            ("End:       ", &self.end_time),
            ("Name:      ", &self.custom_name),
            ("Comment:   ", &self.comment),
        ] {
            if !value.is_empty() {
                text.push_str(&format!("{}{}\n", label, value));
            }
        }
        text
    }
}

impl Document for SessionModel {
    const ENDPOINT: &'static str = "/session";
    const PLURAL: &'static str = "Sessions";
    const SINGULAR: &'static str = "Session";
    const EMPTY: &'static str = "No sessions";

    fn list_row(&self) -> String {
        let label = first_non_empty(&[self.kind.as_str(), self.mood.as_str()]);
        format!("{}  {}  {}", self.id, self.day, truncate(label, LABEL_WIDTH))
    }

    fn render_fields(&self) -> String {
        let mut text = format!("ID:    {}\nDay:   {}\n", self.id, self.day);
        for (label, value) in [
            ("Type:  ", &self.kind),
            ("Mood:  ", &self.mood),
            ("Start: ", &self.start_datetime),
            ("End:   ", &self.end_datetime),
        ] {
            if !value.is_empty() {
                text.push_str(&format!("{}{}\n", label, value));
            }
        }
        text
    }
}

/// A parsed `list` or `get` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentCommand {
    List { query: Vec<(&'static str, String)> },
    Get { id: String },
}

impl DocumentCommand {
    /// Parses the positionals of a document command; `usage` is returned for
    /// an unknown subcommand.
    pub fn parse(args: &[String], usage: &'static str) -> Result<Self, CliError> {
        // `oura tag --start-date ...` is an implicit list
        let (sub, rest) = match args.split_first() {
            Some((first, rest)) if !first.starts_with("--") => (first.as_str(), rest),
            _ => (COMMAND_LIST, args),
        };

        match sub {
            COMMAND_LIST => {
                let matches = parse_flags(list_command(), rest)?;

                let mut query = Vec::new();
                for (names, key) in [
                    (PARAMETER_START_DATE, "start_date"),
                    (PARAMETER_END_DATE, "end_date"),
                    (PARAMETER_NEXT_TOKEN, "next_token"),
                ] {
                    if let Some(value) = first_flag(&matches, &names) {
                        query.push((key, value.to_string()));
                    }
                }
                Ok(DocumentCommand::List { query })
            }
            COMMAND_GET => match rest {
                [id] => Ok(DocumentCommand::Get { id: id.clone() }),
                _ => Err(CliError::MissingArgument("missing document_id".to_string())),
            },
            _ => Err(CliError::Usage(usage)),
        }
    }
}

pub fn render_list<D: Document>(list: &MultiDocumentResponse<D>) -> String {
    if list.data.is_empty() {
        return format!("{}\n", D::EMPTY);
    }

    let mut text = format!("{} ({})\n{}\n", D::PLURAL, list.data.len(), dashes(LIST_RULE_WIDTH));
    for document in &list.data {
        text.push_str(&document.list_row());
        text.push('\n');
    }
    if !list.next_token.is_empty() {
        text.push_str(&format!(
            "{}\nnext_token: {}\n",
            dashes(LIST_RULE_WIDTH),
            list.next_token
        ));
    }
    text
}

pub fn render_single<D: Document>(document: &D) -> String {
    format!(
        "{}\n{}\n{}",
        D::SINGULAR,
        dashes(RULE_WIDTH),
        document.render_fields()
    )
}

/// Runs a parsed document command against the user collection.
pub async fn execute<D: Document, A: UserCollection, W: Write>(
    api: &A,
    command: &DocumentCommand,
    json: bool,
    out: &mut W,
) -> Result<(), CliError> {
    match command {
        DocumentCommand::List { query } => {
            let body = api.api_get(D::ENDPOINT, query).await?;
            if json {
                write_raw_json(out, &body)?;
                return Ok(());
            }
            let list: MultiDocumentResponse<D> =
                serde_json::from_slice(&body).map_err(CliError::ResponseFormat)?;
            write!(out, "{}", render_list(&list))?;
        }
        DocumentCommand::Get { id } => {
            let path = format!("{}/{}", D::ENDPOINT, escape_path_segment(id));
            let body = api.api_get(&path, &[]).await?;
            if json {
                write_raw_json(out, &body)?;
                return Ok(());
            }
            let document: D = serde_json::from_slice(&body).map_err(CliError::ResponseFormat)?;
            write!(out, "{}", render_single(&document))?;
        }
    }
    Ok(())
}
