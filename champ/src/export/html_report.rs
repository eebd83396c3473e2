//! HTML report
//!
//! One self-contained page: frames and the cost table on the left, one
//! figure per watch on the right. Images are referenced relative to the
//! report, from the files directory.

use std::io::Write;

use crate::analysis::CostEntry;

/// Shown instead of a histogram for watches that never fired
pub const NO_VALUES: &str = "No values recorded.";

const HEAD: &str = "<html>
<head>
    <title>champ report</title>
    <style type='text/css'>
    body {
        background-color: #eee;
        font-family: monospace;
    }
    .screenshot {
        background-color: #222;
        box-shadow: inset 0 0 10px rgba(0,0,0,1.0);
        padding: 12px;
        border-radius: 8px;
    }
    th, td {
        text-align: left;
        padding: 0 0.5em;
    }
    </style>
</head>
<body>
";

/// Frame section contents
#[derive(Debug, Clone, Default)]
pub struct FrameSection {
    /// Animation path relative to the report
    pub animation: Option<String>,
    pub frames_observed: usize,
    pub average_cycles_per_frame: Option<u64>,
}

/// One watch figure
#[derive(Debug, Clone)]
pub struct WatchFigure {
    pub caption: String,
    /// Histogram path relative to the report; `None` renders the placeholder
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ReportAssembler {
    pub frames: FrameSection,
    pub costs: Vec<CostEntry>,
    pub watches: Vec<WatchFigure>,
}

impl ReportAssembler {
    #[must_use]
    pub fn new(frames: FrameSection, costs: Vec<CostEntry>, watches: Vec<WatchFigure>) -> Self {
        Self { frames, costs, watches }
    }

    /// The complete page
    #[must_use]
    pub fn render(&self) -> String {
        let mut html = String::from(HEAD);
        html.push_str("<div style='float: left; border-right: 1px solid #aaa;'>\n");
        html.push_str("    <h2>Frames</h2>\n");
        self.render_frames(&mut html);
        html.push_str("    <h2>Cycles</h2>\n");
        self.render_costs(&mut html);
        html.push_str("</div>\n");
        html.push_str("<div style='margin-left: 440px; padding-top: 5px;'>\n");
        html.push_str("    <h2>Watches</h2>\n");
        self.render_watches(&mut html);
        html.push_str("</div>\n</body>\n</html>\n");
        html
    }

    /// Write the page to `writer`
    ///
    /// # Errors
    /// Propagates write errors.
    pub fn write<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        writer.write_all(self.render().as_bytes())?;
        writer.flush()
    }

    fn render_frames(&self, html: &mut String) {
        if let Some(animation) = &self.frames.animation {
            html.push_str(&format!(
                "<img class='screenshot' src='{}' /><br />\n",
                escape(animation)
            ));
        }
        if let Some(average) = self.frames.average_cycles_per_frame {
            html.push_str("<p>\n");
            html.push_str(&format!("Frames recorded: {}<br />\n", self.frames.frames_observed));
            html.push_str(&format!("Average cycles/frame: {average}<br />\n"));
            html.push_str("</p>\n");
        }
    }

    fn render_costs(&self, html: &mut String) {
        html.push_str("<table>\n<thead>\n<tr>\n");
        for column in ["Addr", "CC", "CC %", "Calls", "CC/Call", "Label"] {
            html.push_str(&format!("<th>{}</th>\n", escape(column)));
        }
        html.push_str("</tr>\n</thead>\n");
        for entry in &self.costs {
            html.push_str("<tr>\n");
            html.push_str(&format!("<td>{}</td>\n", entry.address));
            html.push_str(&format!("<td style='text-align: right;'>{}</td>\n", entry.cycles));
            html.push_str(&format!(
                "<td style='text-align: right;'>{:.2}%</td>\n",
                entry.percentage
            ));
            html.push_str(&format!("<td style='text-align: right;'>{}</td>\n", entry.calls));
            html.push_str(&format!(
                "<td style='text-align: right;'>{}</td>\n",
                entry.cycles_per_call
            ));
            html.push_str(&format!(
                "<td>{}</td>\n",
                escape(entry.label.as_deref().unwrap_or(""))
            ));
            html.push_str("</tr>\n");
        }
        html.push_str("</table>\n");
    }

    fn render_watches(&self, html: &mut String) {
        for figure in &self.watches {
            html.push_str("<div style='display: inline-block;'>\n");
            match &figure.image {
                Some(src) => html.push_str(&format!(
                    "<img src='{}' alt='{}'></img>\n",
                    escape(src),
                    escape(&figure.caption)
                )),
                None => {
                    html.push_str(&format!("<p>{}</p>\n", escape(&figure.caption)));
                    html.push_str(&format!("<em>{NO_VALUES}</em>\n"));
                }
            }
            html.push_str("</div>\n");
        }
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&#39;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
