//! # Form Loop
//!
//! Reads one command per line, runs it, then renders the result.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Mutate, then Render                                  │
//! │                                                                         │
//! │  stdin line ──► FormCommand::parse ──► Form::dispatch ──► Response     │
//! │                        │                     │               │          │
//! │                  INVALID_INPUT          commands::*          ▼          │
//! │                        │                     │         render::render   │
//! │                        └─────────────────────┴──────────►  stdout       │
//! │                                                                         │
//! │  Every line produces exactly one response (text block or JSON line).   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

use crate::cli::OutputFormat;
use crate::commands::form::FormOptions;
use crate::commands::invoice::SubmitResponse;
use crate::commands::ledger::InvoiceView;
use crate::commands::{config, form, invoice, ledger};
use crate::error::ApiError;
use crate::render::render;
use crate::state::{ConfigState, DbState, SessionState};

/// Usage lines shown by `help`.
pub const HELP: &[(&str, &str)] = &[
    ("set <field> <value>", "city, customer, gender, payment, date, time, rating"),
    ("add <price> <qty> <product line>", "append a product line"),
    ("delete <n>", "remove product line #n"),
    ("show", "redisplay the invoice"),
    ("submit", "save the invoice"),
    ("next", "start the next customer, or retry a failed start"),
    ("options", "list allowed picker values"),
    ("config", "show store configuration"),
    ("help", "this list"),
    ("quit", "leave the form"),
];

// =============================================================================
// Commands
// =============================================================================

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormCommand {
    Set { field: String, value: String },
    Add { unit_price: String, quantity: String, product_line: String },
    Delete { position: usize },
    Show,
    Submit,
    Next,
    Options,
    Config,
    Help,
    Quit,
}

impl FormCommand {
    /// Parses a typed line. Multi-word values (`Credit card`,
    /// `Food and beverages`) take the rest of the line.
    pub fn parse(line: &str) -> Result<Self, ApiError> {
        let mut words = line.split_whitespace();
        let verb = words
            .next()
            .ok_or_else(|| ApiError::invalid_input("Empty command"))?
            .to_ascii_lowercase();
        let rest: Vec<&str> = words.collect();

        let usage = |usage: &str| ApiError::invalid_input(format!("Usage: {}", usage));

        match verb.as_str() {
            "set" => match rest.split_first() {
                Some((field, value)) if !value.is_empty() => Ok(FormCommand::Set {
                    field: field.to_string(),
                    value: value.join(" "),
                }),
                _ => Err(usage("set <field> <value>")),
            },
            "add" => match rest.as_slice() {
                [price, qty, line @ ..] if !line.is_empty() => Ok(FormCommand::Add {
                    unit_price: price.to_string(),
                    quantity: qty.to_string(),
                    product_line: line.join(" "),
                }),
                _ => Err(usage("add <price> <qty> <product line>")),
            },
            "delete" | "del" | "rm" => match rest.as_slice() {
                [n] => n
                    .parse()
                    .map(|position| FormCommand::Delete { position })
                    .map_err(|_| ApiError::invalid_input(format!("'{}' is not a line number", n))),
                _ => Err(usage("delete <n>")),
            },
            "show" if rest.is_empty() => Ok(FormCommand::Show),
            "submit" if rest.is_empty() => Ok(FormCommand::Submit),
            "next" if rest.is_empty() => Ok(FormCommand::Next),
            "options" if rest.is_empty() => Ok(FormCommand::Options),
            "config" if rest.is_empty() => Ok(FormCommand::Config),
            "help" | "?" => Ok(FormCommand::Help),
            "quit" | "exit" => Ok(FormCommand::Quit),
            other => Err(ApiError::invalid_input(format!(
                "Unknown command '{}'; type `help`",
                other
            ))),
        }
    }
}

/// What a command produced, tagged by `kind` in JSON output.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Response {
    Invoice(InvoiceView),
    Submitted(SubmitResponse),
    Options(FormOptions),
    Config(ConfigState),
    Help,
    Error(ApiError),
    Goodbye,
}

impl<T: Into<Response>> From<Result<T, ApiError>> for Response {
    fn from(result: Result<T, ApiError>) -> Self {
        match result {
            Ok(value) => value.into(),
            Err(err) => Response::Error(err),
        }
    }
}

impl From<InvoiceView> for Response {
    fn from(view: InvoiceView) -> Self {
        Response::Invoice(view)
    }
}

impl From<SubmitResponse> for Response {
    fn from(submitted: SubmitResponse) -> Self {
        Response::Submitted(submitted)
    }
}

// =============================================================================
// Form
// =============================================================================

/// The entry form: the three state objects plus the output format.
#[derive(Debug, Clone)]
pub struct Form {
    db: DbState,
    session: SessionState,
    config: ConfigState,
    output: OutputFormat,
}

impl Form {
    pub fn new(
        db: DbState,
        session: SessionState,
        config: ConfigState,
        output: OutputFormat,
    ) -> Self {
        Form {
            db,
            session,
            config,
            output,
        }
    }

    /// Runs one command against the form state.
    pub async fn dispatch(&self, command: FormCommand) -> Response {
        debug!(?command, "dispatch");
        let (db, session, cfg) = (&self.db, &self.session, &self.config);

        match command {
            FormCommand::Set { field, value } => form::set_field(session, cfg, &field, &value).into(),
            FormCommand::Add {
                unit_price,
                quantity,
                product_line,
            } => ledger::add_line(session, cfg, &unit_price, &quantity, &product_line).into(),
            FormCommand::Delete { position } => ledger::delete_line(session, cfg, position).into(),
            FormCommand::Show => ledger::get_invoice(session, cfg).into(),
            FormCommand::Submit => invoice::submit_invoice(db, session, cfg).await.into(),
            FormCommand::Next => invoice::next_customer(db, session, cfg).await.into(),
            FormCommand::Options => Response::Options(form::get_options()),
            FormCommand::Config => Response::Config(config::get_config(cfg)),
            FormCommand::Help => Response::Help,
            FormCommand::Quit => Response::Goodbye,
        }
    }

    /// Parses and runs one typed line.
    pub async fn handle_line(&self, line: &str) -> Response {
        match FormCommand::parse(line) {
            Ok(command) => self.dispatch(command).await,
            Err(err) => Response::Error(err),
        }
    }

    /// Reads commands until `quit` or end of input.
    ///
    /// The first invoice ID is assigned before the first prompt; if storage
    /// is down at that point the error is shown and the loop still starts.
    pub async fn run<R, W>(&self, reader: R, mut writer: W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        if self.output == OutputFormat::Text {
            let banner = format!("{}: sales invoice entry (type `help`)\n", self.config.store_name);
            writer.write_all(banner.as_bytes()).await?;
        }

        let started: Response =
            invoice::start_invoice(&self.db, &self.session, &self.config).await.into();
        self.write_response(&mut writer, &started).await?;

        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let response = self.handle_line(line).await;
            self.write_response(&mut writer, &response).await?;

            if matches!(response, Response::Goodbye) {
                break;
            }
        }

        info!("Form closed");
        Ok(())
    }

    async fn write_response<W>(&self, writer: &mut W, response: &Response) -> std::io::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        let mut out = render(response, self.output, &self.config);
        out.push('\n');
        if self.output == OutputFormat::Text {
            out.push('\n');
        }
        writer.write_all(out.as_bytes()).await?;
        writer.flush().await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
