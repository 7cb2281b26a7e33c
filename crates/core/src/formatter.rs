//! Front door: option handling and the Format pipeline.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{FormatterError, Result};
use crate::printer::Printer;
use crate::reader::PostScriptReader;
use crate::syntax::{self, grouping, inline};
use crate::tracer::{ResourceProvider, Tracer};

/// Default maximum output line length.
pub const DEFAULT_MAX_LINE_LENGTH: usize = 125;

/// Recognized formatting options.
#[derive(Debug, Clone)]
pub struct FormatOptions {
    /// Pretty-print the tree; `false` reconstructs the source verbatim.
    pub format_code: bool,
    /// Rewrite aliased names to canonical operators and drop the dead
    /// alias definitions.
    pub remove_operator_aliases: bool,
    /// Insert trace-logging calls; requires a resource provider.
    pub add_tracing: bool,
    pub max_line_length: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            format_code: true,
            remove_operator_aliases: true,
            add_tracing: false,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
        }
    }
}

impl FormatOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn format_code(mut self, value: bool) -> Self {
        self.format_code = value;
        self
    }

    pub fn remove_operator_aliases(mut self, value: bool) -> Self {
        self.remove_operator_aliases = value;
        self
    }

    pub fn add_tracing(mut self, value: bool) -> Self {
        self.add_tracing = value;
        self
    }

    pub fn max_line_length(mut self, value: usize) -> Self {
        self.max_line_length = value;
        self
    }
}

/// Cooperative cancellation flag, checked at phase boundaries only. A
/// cancelled run returns [`FormatterError::Cancelled`] and no partial
/// output.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// The formatting pipeline: tokenize → analyze → group → inline → trace →
/// print. Every phase is a pure in-place transform over one owned tree;
/// each Format call is independent.
#[derive(Default)]
pub struct PostScriptFormatter {
    options: FormatOptions,
    resources: Option<Box<dyn ResourceProvider>>,
    cancel: Option<CancelToken>,
}

impl PostScriptFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: FormatOptions) -> Self {
        Self {
            options,
            resources: None,
            cancel: None,
        }
    }

    pub fn options(&self) -> &FormatOptions {
        &self.options
    }

    /// Installs the provider for the trace-prologue resource. Required
    /// when `add_tracing` is set.
    pub fn resource_provider(mut self, provider: impl ResourceProvider + 'static) -> Self {
        self.resources = Some(Box::new(provider));
        self
    }

    pub fn cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Formats PostScript source, per the configured options.
    pub fn format(&self, source: &str) -> Result<String> {
        self.checkpoint()?;
        let tokens = PostScriptReader::new(source).read_to_end()?;
        tracing::debug!(tokens = tokens.len(), "tokenized source");

        self.checkpoint()?;
        let mut tree = syntax::parse(tokens)?;

        self.checkpoint()?;
        grouping::group_regions(&mut tree);

        self.checkpoint()?;
        if self.options.remove_operator_aliases {
            inline::inline_aliases(&mut tree);
            tracing::debug!("operator aliases inlined");
        }

        self.checkpoint()?;
        if self.options.add_tracing {
            let provider = self.resources.as_deref().ok_or_else(|| {
                FormatterError::Configuration(
                    "tracing requested but no resource provider is configured".into(),
                )
            })?;
            Tracer::new(provider).instrument(&mut tree)?;
        }

        self.checkpoint()?;
        let printer = Printer::new(self.options.max_line_length);
        let output = if self.options.format_code {
            printer.print(&tree)
        } else {
            printer.print_verbatim(&tree)
        };
        Ok(output)
    }

    /// Formats a byte stream that must decode as UTF-8 text.
    pub fn format_bytes(&self, source: &[u8]) -> Result<String> {
        let text = std::str::from_utf8(source)
            .map_err(|_| FormatterError::reader(1, 1, "source is not valid UTF-8 text"))?;
        self.format(text)
    }

    fn checkpoint(&self) -> Result<()> {
        match &self.cancel {
            Some(token) if token.is_cancelled() => Err(FormatterError::Cancelled),
            _ => Ok(()),
        }
    }
}
