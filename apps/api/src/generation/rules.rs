//! Résumé template invariants the model must preserve.

use crate::compiler::PROFILE_PHOTO;

/// Structural rules for résumé rewriting. Everything here is copied verbatim
/// into the prompt; only the summary, experience bullets and title may change.
#[derive(Debug, Clone, PartialEq)]
pub struct ResumeRules {
    /// Sections kept in content and position.
    pub pinned_sections: Vec<String>,
    /// Table column directive, e.g. `p{3.8cm}`.
    pub column_spec: String,
}

impl Default for ResumeRules {
    fn default() -> Self {
        Self {
            pinned_sections: vec![
                "Sabbatical & Personal Projects".to_string(),
                "Career Transition".to_string(),
            ],
            column_spec: "p{3.8cm}".to_string(),
        }
    }
}

impl ResumeRules {
    /// Replaces the pinned sections with a `;`-separated list.
    pub fn with_pinned_sections(mut self, raw: &str) -> Self {
        self.pinned_sections = raw
            .split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        self
    }

    pub fn with_column_spec(mut self, column_spec: Option<String>) -> Self {
        if let Some(spec) = column_spec.filter(|s| !s.trim().is_empty()) {
            self.column_spec = spec.trim().to_string();
        }
        self
    }

    /// Numbered rules block for the résumé prompt.
    pub fn render(&self) -> String {
        let mut rules = vec![
            "Keep the section order EXACTLY as in the template".to_string(),
            "Copy all dates, years and months EXACTLY as in the template".to_string(),
        ];
        for section in &self.pinned_sections {
            rules.push(format!(
                "ALWAYS keep \"{section}\" unchanged and at the same position"
            ));
        }
        rules.push(format!(
            "NEVER change the table column width {}",
            self.column_spec
        ));
        rules.push(format!("Keep image file names EXACTLY ({PROFILE_PHOTO})"));
        rules.push("Do NOT change structure, formatting or LaTeX commands".to_string());

        let mut block = String::from("STRICT RULES – NEVER CHANGE:\n");
        for (i, rule) in rules.iter().enumerate() {
            block.push_str(&format!("{}. {rule}\n", i + 1));
        }
        block.push_str(
            "\nONLY ALLOWED:\n\
- Adapt the profile text (summary at the top)\n\
- Adapt the bullet points under professional experience\n\
- Adapt the title/subtitle if it directly fits the position",
        );
        block
    }
}
