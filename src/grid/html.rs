use std::sync::OnceLock;

use html_escape::{
    encode_double_quoted_attribute,
    encode_text,
};
use regex::Regex;

use super::report::{
    Report,
    Section,
    Tile,
};

const PAGE_STYLE: &str = "body{text-align:center;}.grid-container{display:grid;grid-gap:2px;grid-template-columns:repeat(auto-fit,minmax(23px, 1fr));}.key{display:inline-block;width:3em}a,a:visited{color:#000;text-decoration:none;}";
const SOURCE_STYLE: &str = ".datasource{font-style:italic;font-size:0.75em;margin-top:1em;overflow-wrap:break-word;}.datasource a{color:#1034A6;}";
const LOOKUP_URL: &str = "http://jisho.org/search/";

fn url_token_re() -> &'static Regex {
    static URL_RE: OnceLock<Regex> = OnceLock::new();
    URL_RE.get_or_init(|| Regex::new(r"^https?://").expect("url regex is valid"))
}

fn render_tile(html: &mut String, tile: &Tile) {
    let glyph = tile.glyph.to_string();
    match &tile.tooltip {
        Some(tooltip) => html.push_str(&format!(
            "\t<div class=\"grid-item\" style=\"background:{};\" title=\"{}\">",
            tile.background,
            encode_double_quoted_attribute(tooltip)
        )),
        None => html.push_str(&format!("\t<div style=\"background:{};\">", tile.background)),
    }
    html.push_str(&format!(
        "<a href=\"{}{}%20%23kanji\" style=\"color:{};\">{}</a></div>\n",
        LOOKUP_URL,
        encode_double_quoted_attribute(&glyph),
        tile.text_color,
        encode_text(&glyph)
    ));
}

fn render_grid(html: &mut String, tiles: &[Tile]) {
    html.push_str("<div class=\"grid-container\">\n");
    for tile in tiles {
        render_tile(html, tile);
    }
    html.push_str("</div>\n");
}

fn render_section(html: &mut String, section: &Section) {
    if let Some(label) = &section.label {
        html.push_str(&format!("<h2 style=\"color:#888;\">{} Kanji</h2>\n", encode_text(label)));
    }
    if let Some(coverage) = &section.coverage {
        let coverage = coverage.to_string();
        html.push_str(&format!("<h4 style=\"color:#888;\">{}</h4>\n", encode_text(&coverage)));
    }
    render_grid(html, &section.tiles);

    if let Some(missing) = &section.missing {
        html.push_str("<details><summary>Missing kanji</summary><div class=\"grid-container\">\n");
        for tile in missing {
            render_tile(html, tile);
        }
        if missing.is_empty() {
            html.push_str("<b style=\"color:#CCC\">None</b>");
        }
        html.push_str("</div></details>\n");
    }
}

/// Whitespace-separated source text with `http(s)://` tokens turned into links.
pub fn render_source(source: &str) -> String {
    source
        .split(' ')
        .map(|word| {
            if url_token_re().is_match(word) {
                let label = urlencoding::decode(word)
                    .map(|decoded| decoded.into_owned())
                    .unwrap_or_else(|_| word.to_string());
                format!(
                    "<a href=\"{}\">{}</a>",
                    encode_double_quoted_attribute(word),
                    encode_text(&label)
                )
            } else {
                encode_text(word).into_owned()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Renders a report as a standalone HTML page.
pub fn render_html(report: &Report) -> String {
    let mut html = String::new();

    html.push_str(&format!(
        "<!doctype html><html lang=\"{}\"><head><meta charset=\"UTF-8\" /><title>Anki Kanji Grid</title>",
        encode_double_quoted_attribute(&report.language)
    ));
    html.push_str(&format!("<style type=\"text/css\">{}</style>", PAGE_STYLE));
    html.push_str("</head>\n<body>\n");
    html.push_str(&format!(
        "<span style=\"font-size: 3em;color: #888;\">{}</span><br>\n",
        encode_text(&report.title)
    ));

    html.push_str("<div style=\"margin-bottom: 24pt;padding: 20pt;\"><p style=\"text-align: center\">Key:</p>");
    html.push_str("<p style=\"text-align: center\">Weak&nbsp;");
    for color in &report.key {
        html.push_str(&format!(
            "<span class=\"key\" style=\"background-color: {};\">&nbsp;</span>",
            color
        ));
    }
    html.push_str("&nbsp;Strong</p></div>\n");
    html.push_str("<div style=\"clear: both;\"><br><hr style=\"border-style: dashed;border-color: #666;width: 100%;\"><br></div>\n");
    html.push_str("<div style=\"text-align: center;\">\n");

    if let Some(total) = report.total_units {
        html.push_str(&format!("<h4 style=\"color:#888;\">{} total unique kanji</h4>\n", total));
    }
    for section in &report.sections {
        render_section(&mut html, section);
    }

    if let Some(source) = &report.source {
        html.push_str(&format!(
            "<style type=\"text/css\">{}</style><span class=\"datasource\">Data source: {}</span>",
            SOURCE_STYLE,
            render_source(source)
        ));
    }

    html.push_str("</div></body></html>\n");
    html
}
