//! README generation prompts
//!
//! The prompt is a pure function of its inputs: the same contents and tree
//! always render the same system/user pair.

use containerizer_core::Prompt;
use std::collections::BTreeMap;
use std::fmt::{Display, Write};

/// System prompt for README generation
pub const README_SYSTEM_PROMPT: &str = "You are an expert software architect and documentation generator.
Use the provided files to generate a clear, production-ready README.md in Markdown format.";

/// Closing instructions listing the README sections
pub const README_INSTRUCTIONS: &str = "**Instructions:**
Based on the above files, produce a README.md with:
- Title
- Overview
- Installation
- Usage
- Development
- Folder Layout
- Testing
- Docker (if applicable)
- Configuration
- Contributing
- License

If any information is missing, insert minimal TODO notes.
Return only the README.md in your response.";

/// Builds the README prompt from file contents and the rendered tree
#[derive(Debug, Clone, Default)]
pub struct PromptAssembler;

impl PromptAssembler {
    pub fn new() -> Self {
        Self
    }

    /// Render the prompt pair
    ///
    /// Entries appear in path order. Values only need `Display`, so error
    /// markers and non-string content pass through as text.
    pub fn assemble<V: Display>(&self, contents: &BTreeMap<String, V>, directory_tree: &str) -> Prompt {
        let mut user_prompt = String::from("**Files and their contents:**\n\n");

        for (path, content) in contents {
            let text = content.to_string();
            let _ = write!(user_prompt, "### {}\n\n```\n{}\n```\n\n", path, text.trim());
        }

        let _ = write!(user_prompt, "\n\n# File Structure:\n\n{}", directory_tree);
        user_prompt.push_str(README_INSTRUCTIONS);

        Prompt {
            system_prompt: README_SYSTEM_PROMPT.to_string(),
            user_prompt,
        }
    }
}
