use bevy::{
    asset::{AssetLoader, LoadContext, io::Reader},
    prelude::*,
};

use crate::game::skins::SkinCatalog;

/// Asset loader for [`SkinCatalog`] RON files
#[derive(Default, TypePath)]
pub struct SkinCatalogLoader;

impl AssetLoader for SkinCatalogLoader {
    type Asset = SkinCatalog;
    type Settings = ();
    type Error = anyhow::Error;

    async fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &Self::Settings,
        _load_context: &mut LoadContext<'_>,
    ) -> Result<Self::Asset, Self::Error> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).await?;
        let catalog: SkinCatalog = ron::de::from_bytes(&bytes)?;
        catalog.validate()?;
        Ok(catalog)
    }

    fn extensions(&self) -> &[&str] {
        &["ron"]
    }
}
