//! Prompt templates for grading and generation calls

use crate::domain::EntityRef;

/// System instructions for the document relevance grader
pub const DOC_GRADER_INSTRUCTIONS: &str = "You are a grader assessing the relevance of a \
retrieved document to a user question. If the document contains keywords or semantic meaning \
related to the question, grade it as relevant.";

/// System instructions for the grounding (hallucination) grader
pub const GROUNDING_GRADER_INSTRUCTIONS: &str = "You are a grader assessing whether an answer \
is grounded in a set of retrieved facts. Grade 'yes' only if every claim in the answer is \
supported by the facts.";

/// System instructions for the usefulness grader
pub const USEFULNESS_GRADER_INSTRUCTIONS: &str = "You are a grader assessing whether an answer \
addresses a user question. An answer that resolves the question and additionally provides \
extra information still counts as addressing it.";

const JSON_GRADE_FORMAT: &str = "Return JSON with two keys: binary_score is 'yes' or 'no', and \
explanation contains a short justification for the score.";

/// User prompt asking whether a document is relevant to the question
pub fn doc_grader_prompt(document: &str, question: &str) -> String {
    format!(
        "Here is the retrieved document:\n\n{document}\n\nHere is the user question:\n\n\
{question}\n\nCarefully and objectively assess whether the document contains at least some \
information that is relevant to the question.\n\n{JSON_GRADE_FORMAT}"
    )
}

/// User prompt asking whether an answer is grounded in the documents
pub fn grounding_grader_prompt(documents_text: &str, answer: &str) -> String {
    format!(
        "Here are the retrieved facts:\n\n{documents_text}\n\nHere is the answer:\n\n{answer}\n\n\
Assess whether the answer is grounded in the facts above and nothing else.\n\n{JSON_GRADE_FORMAT}"
    )
}

/// User prompt asking whether an answer addresses the question
pub fn usefulness_grader_prompt(question: &str, answer: &str) -> String {
    format!(
        "Here is the user question:\n\n{question}\n\nHere is the answer:\n\n{answer}\n\n\
Assess whether the answer addresses the question.\n\n{JSON_GRADE_FORMAT}"
    )
}

/// Join passages with a blank-line separator, preserving order
pub fn format_documents(documents: &[String]) -> String {
    documents.join("\n\n")
}

/// Format graph entities as a context block for the generation prompt
pub fn format_entities(entities: &[EntityRef], max_entities: usize) -> String {
    let mut block = String::from("Relevant Entities:\n");

    for entity in entities.iter().take(max_entities) {
        block.push_str(&format!(
            "- {} ({}): {} [Relevance: {:.2}]\n",
            entity.id, entity.entity_type, entity.description, entity.score
        ));
    }

    block
}

/// Generation prompt built from the relevant passages and the question
pub fn rag_prompt(documents_text: &str, question: &str) -> String {
    format!(
        "You are an assistant for question-answering tasks.\n\n\
Here is the context to use to answer the question:\n\n{documents_text}\n\n\
Think carefully about the above context.\n\n\
Now, review the user question:\n\n{question}\n\n\
Provide an answer to this question using only the above context.\n\nAnswer:"
    )
}

/// Generation prompt enriched with graph entities
pub fn rag_prompt_with_entities(
    documents_text: &str,
    entity_context: &str,
    question: &str,
) -> String {
    format!(
        "You are an assistant for question-answering tasks.\n\n\
Here is the context from documents:\n\n{documents_text}\n\n{entity_context}\n\
Think carefully about both the documents and entities above.\n\n\
Now, answer the user question:\n\n{question}\n\n\
When referencing entities, use their full names and types (e.g. \"Albert Einstein (Person)\"). \
If multiple entities are relevant, explain their relationships.\n\nAnswer:"
    )
}
