/// Fixed instructions sent ahead of every question.
pub fn system_preamble(panel_url: &str) -> String {
    format!(
        "You are a Minecraft server support bot that helps with server hosting panel issues.\n\
         Focus only on Minecraft server management and technical problems.\n\
         Respond in the same language as the user's query (Arabic or English).\n\
         Only discuss server technical issues and hosting-related topics.\n\
         Never recommend specific hosting providers.\n\
         Keep responses focused on solving technical problems.\n\
         When users ask about the panel URL, provide: {}",
        panel_url
    )
}

/// The file section is always present, even when no attachment was read.
pub fn build_prompt(preamble: &str, question: &str, file_content: &str) -> String {
    format!(
        "{}\n\nUser question: {}\n\nFile content: {}",
        preamble, question, file_content
    )
}
