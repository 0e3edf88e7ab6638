use crate::config::AppConfig;
use crate::error::AppError;
use crate::services::{SlotResolver, SlotSet};
use async_trait::async_trait;
use aws_sdk_lexruntimev2::error::DisplayErrorContext;
use aws_sdk_lexruntimev2::types::Slot;
use aws_sdk_lexruntimev2::Client;

pub struct LexSlotResolver {
    client: Client,
    bot_id: String,
    bot_alias_id: String,
    locale_id: String,
}

impl LexSlotResolver {
    pub fn new(client: Client, config: &AppConfig) -> Self {
        Self {
            client,
            bot_id: config.lex_bot_id.clone(),
            bot_alias_id: config.lex_bot_alias_id.clone(),
            locale_id: config.lex_locale_id.clone(),
        }
    }
}

#[async_trait]
impl SlotResolver for LexSlotResolver {
    async fn resolve_slots(&self, text: &str, session_id: &str) -> Result<SlotSet, AppError> {
        log::debug!("RecognizeText on bot {} (session {})", self.bot_id, session_id);
        let output = self
            .client
            .recognize_text()
            .bot_id(&self.bot_id)
            .bot_alias_id(&self.bot_alias_id)
            .locale_id(&self.locale_id)
            .session_id(session_id)
            .text(text)
            .send()
            .await
            .map_err(|e| AppError::Language(DisplayErrorContext(&e).to_string()))?;

        let slots = output
            .session_state()
            .and_then(|state| state.intent())
            .and_then(|intent| intent.slots());

        Ok(slots
            .map(|slots| {
                slots
                    .iter()
                    .map(|(name, slot)| (name.clone(), interpreted_value(slot)))
                    .collect()
            })
            .unwrap_or_default())
    }
}

fn interpreted_value(slot: &Slot) -> Option<String> {
    slot.value()
        .map(|value| value.interpreted_value().to_string())
}
