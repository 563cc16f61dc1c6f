//! crates/assistant_core/src/industry.rs
//!
//! Compiled-in industry presets: the UI copy, sample prompts, and document
//! type labels a deployment is branded with. Selected once at startup by
//! the `INDUSTRY_TEMPLATE` key; unknown keys fall back to `general`.

/// A static bundle of UI copy and sample prompts selected by a template key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndustryConfig {
    /// The normalized preset key (`legal`, `healthcare`, `finance`, `general`).
    pub key: &'static str,
    pub title: &'static str,
    pub icon: &'static str,
    pub placeholder: &'static str,
    pub sample_questions: &'static [&'static str],
    pub document_types: &'static [&'static str],
}

const LEGAL: IndustryConfig = IndustryConfig {
    key: "legal",
    title: "Legal AI Assistant",
    icon: "⚖️",
    placeholder: "Ask me about contracts, legal documents, or case research...",
    sample_questions: &[
        "Analyze this contract for potential risks",
        "What are the key terms in this agreement?",
        "Find relevant case law for this matter",
        "Draft a clause for intellectual property protection",
    ],
    document_types: &["Contract", "Legal Brief", "Case File", "Regulation", "Policy"],
};

const HEALTHCARE: IndustryConfig = IndustryConfig {
    key: "healthcare",
    title: "Healthcare AI Assistant",
    icon: "🏥",
    placeholder: "Ask me about medical documents, patient data, or clinical research...",
    sample_questions: &[
        "Summarize this patient's medical history",
        "What are the key findings in this report?",
        "Identify drug interactions in this prescription",
        "Analyze this clinical trial data",
    ],
    document_types: &[
        "Medical Record",
        "Lab Report",
        "Prescription",
        "Clinical Notes",
        "Research Paper",
    ],
};

const FINANCE: IndustryConfig = IndustryConfig {
    key: "finance",
    title: "Financial AI Assistant",
    icon: "📊",
    placeholder: "Ask me about financial documents, reports, or market analysis...",
    sample_questions: &[
        "Analyze this financial statement",
        "What are the risk factors in this investment?",
        "Summarize quarterly earnings trends",
        "Identify compliance issues in this report",
    ],
    document_types: &[
        "Financial Statement",
        "Earnings Report",
        "Investment Analysis",
        "Audit Report",
        "Compliance Document",
    ],
};

const GENERAL: IndustryConfig = IndustryConfig {
    key: "general",
    title: "AI Document Assistant",
    icon: "🤖",
    placeholder: "Ask me anything about your documents...",
    sample_questions: &[
        "Summarize this document",
        "What are the key points?",
        "Find information about specific topics",
        "Compare multiple documents",
    ],
    document_types: &["Document", "Report", "Presentation", "Spreadsheet", "Text File"],
};

impl IndustryConfig {
    /// Looks up the preset for a template key. A key outside the fixed
    /// table always yields the `general` preset; this lookup cannot fail.
    pub fn for_template(key: &str) -> &'static IndustryConfig {
        match key {
            "legal" => &LEGAL,
            "healthcare" => &HEALTHCARE,
            "finance" => &FINANCE,
            _ => &GENERAL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_templates_resolve_to_their_presets() {
        assert_eq!(IndustryConfig::for_template("legal").title, "Legal AI Assistant");
        assert_eq!(
            IndustryConfig::for_template("healthcare").title,
            "Healthcare AI Assistant"
        );
        assert_eq!(
            IndustryConfig::for_template("finance").title,
            "Financial AI Assistant"
        );
        assert_eq!(
            IndustryConfig::for_template("general").title,
            "AI Document Assistant"
        );
    }

    #[test]
    fn unrecognized_template_falls_back_to_general_exactly() {
        let fallback = IndustryConfig::for_template("aerospace");
        assert_eq!(fallback, IndustryConfig::for_template("general"));
        assert_eq!(fallback.key, "general");
    }

    #[test]
    fn presets_carry_four_sample_questions_each() {
        for key in ["legal", "healthcare", "finance", "general"] {
            assert_eq!(IndustryConfig::for_template(key).sample_questions.len(), 4);
        }
    }
}
