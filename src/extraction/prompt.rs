//! Rate confirmation extraction prompt
//!
//! The document text is interpolated verbatim. Nothing is escaped, so text in
//! the document that reads like instructions reaches the model unchanged.

/// System role sent with every request
pub const SYSTEM_ROLE: &str = "You are an expert logistics dispatcher bot.";

const INSTRUCTIONS: &str = r#"Read the rate confirmation text below and extract the following fields:
- Load #
- REF #
- Pickup (PU): date, time, shipper name, address
- Delivery (DEL): date, time, receiver name, address
- Rate
- Miles
- Fines or Notes
- Any other important details or numbers found in the text.


Return the answer in this exact format (if there is any additional info, include it):

Load# [number]

REF# [reference number]

⏳ PU: [pickup date + time (Earliest-Latest)]

[shipper name]
[address line 1]
[address line 2 if any]

⏳ DEL: [delivery date + time (Earliest-Latest)]

[receiver name]
[address line 1]
[address line 2 if any]

_____

Rate: [amount] $
Mile: [miles] miles

⏰Late pick up = $250 fine❗️
⏰Late delivery = $250 fine❗️ important to keep the business
📝BOL/POD/Freight/Seal pictures MUST send otherwise $250 fine❗️
🚨 No update / $250 fine❗️

Your communication is really going smoothly❗️

If any field is missing, write "Not found" but **keep the format identical**.

---
RATE CONFIRMATION TEXT:
"#;

/// System and user messages for one extraction request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionPrompt {
    pub system: String,
    pub user: String,
}

/// Embed document text into the fixed extraction template
pub fn build_prompt(text: &str) -> ExtractionPrompt {
    let mut user = String::with_capacity(INSTRUCTIONS.len() + text.len() + 1);
    user.push_str(INSTRUCTIONS);
    user.push_str(text);
    user.push('\n');

    ExtractionPrompt {
        system: SYSTEM_ROLE.to_string(),
        user,
    }
}
