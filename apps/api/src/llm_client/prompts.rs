// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it;
// this file holds fragments used by more than one of them.

/// Product name the model is told it works for.
pub const PRODUCT_NAME: &str = "AI Resume Pro";

/// Writing rules shared by every task that produces resume Markdown.
pub const RESUME_STYLE_RULES: &str = "\
    Use strong action verbs (e.g. Managed, Developed, Increased) to open every bullet. \
    Quantify achievements wherever the source allows it. \
    Return clean Markdown with clear section headings.";
