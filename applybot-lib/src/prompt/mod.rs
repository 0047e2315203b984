//! Prompt assembly
//!
//! The template wording steers the model into answering as the applicant.
//! Changing it changes every answer, so treat edits as a behaviour change.

use crate::document::Document;

/// Persona template. `{context}` and `{question}` are substituted.
pub const PROMPT_TEMPLATE: &str = "
You are an assistant helping a job applicant complete job applications.
For the purpose of this excercise, you will pretend to be the job applicant.
Use the following retrieved context to inform the tone and style of your answers.
The context contains examples of the applicant's previous responses to job application questions.
You should ALWAYS answer in the first person, as if you are the job applicant.
You should NEVER refer to the job applicant in the third person.
Retrieved context:
{context}
Now, based on the style and content of the above context, please answer the following job application question:
Question: {question}
Answer:
";

/// Render documents as `"{Kind}: {text}"` blocks separated by blank lines.
#[must_use]
pub fn format_context(documents: &[Document]) -> String {
    documents
        .iter()
        .map(|doc| format!("{}: {}", capitalize(doc.kind()), doc.text))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Fill the persona template with the retrieved context and the question.
#[must_use]
pub fn assemble(documents: &[Document], question: &str) -> String {
    // Context first so a literal "{question}" inside it is left alone
    let (head, tail) = PROMPT_TEMPLATE
        .split_once("{question}")
        .unwrap_or((PROMPT_TEMPLATE, ""));
    let head = head.replacen("{context}", &format_context(documents), 1);
    format!("{head}{question}{tail}")
}

/// Uppercase the first character and lowercase the rest ("qa_pair" -> "Qa_pair").
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
