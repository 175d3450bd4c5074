//! Prompts for link selection and brochure synthesis.

use crate::page::PageContent;
use crate::types::Tone;

/// System prompt for the link-selection call.
///
/// The JSON example pins the response shape; the request itself also
/// runs in JSON-object mode.
pub const LINK_SELECTION_SYSTEM_PROMPT: &str = r#"You are provided with a list of links found on a webpage.
You are able to decide which of the links would be most relevant to include in a brochure about the company,
such as links to an About page, a Company page, Services, Products, or Careers/Jobs pages.

You should respond in JSON as in this example:
{
    "links": [
        {"type": "about page", "url": "https://full.url/goes/here/about"},
        {"type": "careers page", "url": "https://another.full.url/careers"},
        {"type": "services page", "url": "https://example.com/services"}
    ]
}"#;

/// User prompt for the link-selection call, listing at most
/// `max_links` seed-page links.
pub fn link_selection_user_prompt(seed: &PageContent, max_links: usize) -> String {
    let mut prompt = format!(
        "Here is the list of links from the website {} - \
         please decide which of these are relevant web links for a brochure about the company. \
         Respond with the full https URL in JSON format. \
         Do not include Terms of Service, Privacy Policy, email links, or social media links.\n\n\
         Links:\n",
        seed.url
    );
    for link in seed.links.iter().take(max_links) {
        prompt.push_str(link);
        prompt.push('\n');
    }
    prompt
}

/// System prompt for brochure synthesis, carrying the tone phrase and
/// (for non-English output) the language clause.
pub fn brochure_system_prompt(language: &str, tone: Tone) -> String {
    let language_clause = if language == "English" {
        String::new()
    } else {
        format!(" in {}", language)
    };

    format!(
        "You are an expert marketing copywriter that analyzes company website content \
         and creates compelling brochures for prospective customers, investors, and recruits.\n\n\
         Write the brochure{} with a {} tone.\n\n\
         Structure the brochure with:\n\
         1. Company name and tagline\n\
         2. About/Overview section\n\
         3. Products/Services\n\
         4. Company culture and values\n\
         5. Customer focus\n\
         6. Career opportunities (if available)\n\
         7. Contact information\n\n\
         Use markdown formatting and make it visually appealing and professional.\n\
         Include specific details from the website content provided.",
        language_clause,
        tone.phrase()
    )
}

/// User prompt for brochure synthesis, embedding the corpus verbatim.
pub fn brochure_user_prompt(company_name: &str, corpus: &str) -> String {
    format!(
        "Company name: {}\n\n\
         Here is the website content to analyze:\n{}\n\n\
         Create a comprehensive marketing brochure based on this information.",
        company_name, corpus
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_prompt_caps_link_count() {
        let mut page = PageContent::from_html("https://example.com", "<html><body></body></html>");
        page.links = (0..80)
            .map(|i| format!("https://example.com/page-{}", i))
            .collect();

        let prompt = link_selection_user_prompt(&page, 50);

        assert!(prompt.contains("https://example.com/page-49"));
        assert!(!prompt.contains("https://example.com/page-50"));
    }

    #[test]
    fn test_system_prompt_omits_language_for_english() {
        let english = brochure_system_prompt("English", Tone::Professional);
        assert!(english.contains("Write the brochure with a professional and formal tone."));

        let spanish = brochure_system_prompt("Spanish", Tone::Humorous);
        assert!(spanish.contains("Write the brochure in Spanish with a humorous and funny tone."));
    }

    #[test]
    fn test_user_prompt_embeds_corpus_verbatim() {
        let prompt = brochure_user_prompt("Acme", "Landing page:\nWebpage Title:\nAcme\n");
        assert!(prompt.contains("Company name: Acme"));
        assert!(prompt.contains("Landing page:\nWebpage Title:\nAcme\n"));
    }
}
