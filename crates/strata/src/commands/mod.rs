mod cat;
mod clips;
mod info;
mod list;
mod locate;
mod pack;

pub use cat::{cat_asset, CatAssetArgs};
pub use clips::{list_clips, ListClipsArgs};
pub use info::{info_stack, InfoStackArgs};
pub use list::{list_bundle, ListBundleArgs};
pub use locate::{locate_asset, LocateAssetArgs};
pub use pack::{pack_bundle, PackBundleArgs, PackCompression};
