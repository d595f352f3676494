//! Prompt construction for the summary agent.

use super::options::{SummaryFormat, SummaryOptions, SummaryStyle};

pub const SYSTEM_PROMPT: &str = "あなたは専門的な要約エージェントです。指定された条件に従って正確で簡潔な要約を作成してください。";

/// Upper bound on requested completion tokens.
pub const MAX_COMPLETION_TOKENS: u64 = 2000;

/// Sampling temperature; low to keep the summary faithful to the source.
pub const SUMMARY_TEMPERATURE: f64 = 0.3;

/// Completion token budget for a summary of `max_length` characters.
pub fn token_budget(max_length: usize) -> u64 {
    (max_length as u64)
        .saturating_mul(2)
        .min(MAX_COMPLETION_TOKENS)
}

fn format_instruction(format: SummaryFormat) -> &'static str {
    match format {
        SummaryFormat::Bullets => "箇条書き（•）形式で出力してください。",
        SummaryFormat::Structured => "概要・主要ポイント・結論の構造で出力してください。",
        SummaryFormat::Paragraph => "段落形式で出力してください。",
    }
}

fn style_instruction(style: SummaryStyle) -> &'static str {
    match style {
        SummaryStyle::Casual => "カジュアルで親しみやすい文体で書いてください。",
        SummaryStyle::Academic => "学術的で正確な文体で書いてください。",
        SummaryStyle::Formal => "フォーマルで礼儀正しい文体で書いてください。",
    }
}

/// Build the user prompt. The source text is embedded verbatim.
pub fn build_prompt(text: &str, options: &SummaryOptions) -> String {
    let mut conditions = vec![
        format!("- 最大{}文字", options.max_length),
        format!("- 言語: {}", options.language.prompt_label()),
        format!("- {}", format_instruction(options.format)),
        format!("- {}", style_instruction(options.style)),
    ];
    if !options.focus_areas.is_empty() {
        conditions.push(format!(
            "- 特に以下の分野に重点を置いてください: {}",
            options.focus_areas.join(", ")
        ));
    }

    format!(
        "以下の文書を要約してください。

条件:
{conditions}

また、要約とは別に、重要なポイントを3-5個の箇条書きで抽出してください。

文書:
{text}

回答形式:
要約: [ここに要約を記載]

重要ポイント:
• [ポイント1]
• [ポイント2]
• [ポイント3]
",
        conditions = conditions.join("\n"),
        text = text,
    )
}
