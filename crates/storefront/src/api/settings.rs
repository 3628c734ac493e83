//! Site settings endpoints.

use tracing::instrument;

use super::types::{
    ContactEnvelope, ContactSettings, ContactUpdate, HeroEnvelope, HeroSettings, HeroUpdate,
    SettingsEnvelope, SiteSettings,
};
use super::{ApiClient, ApiError};

/// `/settings` endpoints. Reads are public, writes need an admin token.
#[derive(Debug, Clone, Copy)]
pub struct SettingsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> SettingsApi<'a> {
    pub(super) const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Current site settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get(&self) -> Result<SiteSettings, ApiError> {
        let response: SettingsEnvelope<SiteSettings> = self.client.get("/settings").await?;
        Ok(response.settings)
    }

    /// Replace every setting.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, settings))]
    pub async fn update(&self, settings: &SiteSettings) -> Result<SiteSettings, ApiError> {
        let response: SettingsEnvelope<SiteSettings> = self
            .client
            .put("/settings", &SettingsEnvelope { settings })
            .await?;
        Ok(response.settings)
    }

    /// Update the home page banner text.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn update_hero(&self, hero: &HeroUpdate) -> Result<HeroSettings, ApiError> {
        let response: HeroEnvelope = self.client.put("/settings/hero", hero).await?;
        Ok(response.hero)
    }

    /// Update the shop's contact channels.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn update_contact(
        &self,
        contact: &ContactUpdate,
    ) -> Result<ContactSettings, ApiError> {
        let response: ContactEnvelope = self.client.put("/settings/contact", contact).await?;
        Ok(response.contact)
    }

    /// Restore the backend defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn reset(&self) -> Result<SiteSettings, ApiError> {
        let response: SettingsEnvelope<SiteSettings> =
            self.client.post_empty("/settings/reset").await?;
        Ok(response.settings)
    }
}
