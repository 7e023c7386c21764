use std::fmt::Write;

use examdoc::markup::Delimiter;

use crate::request::ExamRequest;

/// Build the instruction text sent to the generative model.
///
/// The answer is expected in the markup understood by
/// [`examdoc::markup::convert`], so the grammar is spelled out at the end.
pub fn build_prompt(request: &ExamRequest) -> String {
    let mut out = String::new();

    // Writing to a String cannot fail.
    let _ = writeln!(
        out,
        "You are an experienced teacher. Write a {} in {} for {} students.",
        or_unspecified(&request.exam_type),
        or_unspecified(&request.subject),
        or_unspecified(&request.grade_level),
    );
    let _ = writeln!(
        out,
        "Write the entire document in {}.",
        request.language.name()
    );
    out.push('\n');

    out.push_str("Parameters:\n");
    if let Some(n) = request.total_questions {
        let _ = writeln!(out, "- Number of questions: {}", n);
    }
    if !request.question_types.is_empty() {
        let labels: Vec<&str> = request.question_types.iter().map(|t| t.label()).collect();
        let _ = writeln!(out, "- Question types: {}", labels.join(", "));
    }
    if let Some(difficulty) = request.difficulty {
        let _ = writeln!(out, "- Difficulty: {}", difficulty);
    }
    let _ = writeln!(out, "- Duration: {}", or_unspecified(&request.time_limit));
    push_optional(&mut out, "- Keywords", &request.keywords);
    out.push('\n');

    push_section(&mut out, "Learning objectives", &request.objectifs_pedagogiques);
    push_section(&mut out, "Specific constraints", &request.contraintes_specifiques);
    push_section(
        &mut out,
        "Example questions to guide the style",
        &request.exemples_questions,
    );

    out.push_str("Base every question on the following course material:\n");
    out.push_str("<<<\n");
    out.push_str(request.topic_text.trim());
    out.push_str("\n>>>\n\n");

    out.push_str(&markup_instructions());
    out
}

/// The markup grammar, one rule per line.
pub fn markup_instructions() -> String {
    let mut out = String::from(
        "Answer in plain text, one paragraph per line, using only this markup:\n",
    );
    out.push_str("- start a line with \"# \" for the exam title or \"## \" for a part heading\n");
    let rules = [
        (Delimiter::Bold, "bold"),
        (Delimiter::Italic, "italic"),
        (Delimiter::Underline, "underline"),
    ];
    for (delimiter, effect) in rules {
        let d = delimiter.as_str();
        let _ = writeln!(out, "- {}text{} for {}", d, d, effect);
    }
    let _ = writeln!(
        out,
        "- {} switches the text color to the next highlight color",
        Delimiter::Color.as_str()
    );
    out.push_str("Do not use any other Markdown syntax.\n");
    out
}

fn or_unspecified(value: &str) -> &str {
    let value = value.trim();
    if value.is_empty() { "(unspecified)" } else { value }
}

fn push_optional(out: &mut String, label: &str, value: &str) {
    let value = value.trim();
    if !value.is_empty() {
        let _ = writeln!(out, "{}: {}", label, value);
    }
}

fn push_section(out: &mut String, title: &str, body: &str) {
    let body = body.trim();
    if !body.is_empty() {
        let _ = writeln!(out, "{}:\n{}\n", title, body);
    }
}
