use colored::Colorize;
use std::io::{self, Write};

pub struct RenderOpts {
    pub show_examples: bool,
}

impl Default for RenderOpts {
    fn default() -> Self {
        RenderOpts {
            show_examples: true,
        }
    }
}

/// Help for the interactive dashboard
pub fn render_help<W: Write>(mut out: W, opts: &RenderOpts) -> io::Result<()> {
    writeln!(out, "{}", "Finreport - Dashboard Help".bold())?;
    writeln!(out)?;

    writeln!(out, "{}", "Views:".bold())?;
    writeln!(out, "  {:24} - Headline metrics and detail table", "summary")?;
    writeln!(out, "  {:24} - Income statement by year, with YoY change", "income")?;
    writeln!(out, "  {:24} - Balance overview and category totals", "balance")?;
    writeln!(out, "  {:24} - Operating and net margins", "analysis")?;
    writeln!(out, "  {:24} - Every view in order", "all")?;

    writeln!(out)?;
    writeln!(out, "{}", "Data & output:".bold())?;
    writeln!(out, "  {:24} - Fetch the data source again", "reload")?;
    writeln!(out, "  {:24} - Write the static HTML report", "export [path]")?;

    writeln!(out)?;
    writeln!(out, "{}", "Session:".bold())?;
    writeln!(out, "  {:24} - Show this help", "help")?;
    writeln!(out, "  {:24} - Exit the dashboard", "exit")?;

    writeln!(out)?;
    if opts.show_examples {
        writeln!(out, "{}", "Examples:".bold())?;
        writeln!(out, "  /income")?;
        writeln!(out, "  export reports/2024.html")?;
        writeln!(out)?;
    }
    Ok(())
}
