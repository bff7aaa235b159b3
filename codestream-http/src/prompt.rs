/// Upper bound on completion tokens for every provider call.
pub const MAX_COMPLETION_TOKENS: u32 = 8192;

/// Model identifier used when the request does not name one.
pub const DEFAULT_MODEL: &str = "cerebras/llama-3.3-70b";

/// Sampling temperature used when the request does not set one.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

const BASE_TEMPLATE: &str = "\
You are an expert software engineer generating complete, runnable code.

Dependency declarations:
- Every external package the generated code imports must be declared.
- Declare a single dependency as <package>name</package>.
- Declare several at once as <packages>name, name</packages>; commas and
  newlines both separate names.
- Declare a package no later than the first file that uses it.

File completeness:
- Always emit whole files, never fragments.
- Do not truncate files with placeholders such as \"rest unchanged\".

Style:
- Prefer small, composable functions and descriptive names.
- Match the conventions already present in any provided files.";

/// Compose the final system prompt: the fixed instructional template, the
/// caller's optional addition, then a labeled block of existing file
/// contents when supplied.
pub fn compose_system_prompt(system_prompt: Option<&str>, file_contents: Option<&str>) -> String {
    let mut composed = String::from(BASE_TEMPLATE);

    if let Some(extra) = system_prompt {
        if !extra.is_empty() {
            composed.push_str("\n\n");
            composed.push_str(extra);
        }
    }

    if let Some(files) = file_contents {
        if !files.is_empty() {
            composed.push_str("\n\nExisting files:\n");
            composed.push_str(files);
        }
    }

    composed
}
