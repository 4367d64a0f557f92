pub mod assets;

use bevy::prelude::*;

use crate::game::skins::SkinCatalog;

pub use assets::SkinCatalogLoader;

/// Handle of the catalog while it loads
#[derive(Resource)]
struct SkinCatalogHandle(Handle<SkinCatalog>);

pub(super) fn plugin(app: &mut App) {
    // Register the asset loader for RON config files
    app.init_asset::<SkinCatalog>();
    app.init_asset_loader::<SkinCatalogLoader>();

    app.add_systems(Startup, load_skin_catalog);
    app.add_systems(
        Update,
        install_skin_catalog.run_if(not(resource_exists::<SkinCatalog>)),
    );
}

fn load_skin_catalog(mut commands: Commands, asset_server: Res<AssetServer>) {
    let handle = asset_server.load(SkinCatalog::PATH);
    commands.insert_resource(SkinCatalogHandle(handle));
}

/// Copies the loaded catalog into a resource so systems can read it directly.
fn install_skin_catalog(
    mut commands: Commands,
    handle: Option<Res<SkinCatalogHandle>>,
    catalogs: Res<Assets<SkinCatalog>>,
) {
    let Some(handle) = handle else {
        return;
    };
    let Some(catalog) = catalogs.get(&handle.0) else {
        return;
    };
    info!(
        "Skin catalog loaded: {} characters, {} showcase regions",
        catalog.characters.len(),
        catalog.showcase_regions
    );
    commands.insert_resource(catalog.clone());
}
