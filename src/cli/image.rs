//! Compute images

use anyhow::Result;
use clap::{Args, Subcommand};
use serde_json::{json, Value};

use crate::api::query::{self, ListRequest};
use crate::api::Product;
use crate::cli::common::{self, PageArgs, WaitArgs};
use crate::cli::completion::{complete, Resource};
use crate::core::{execute, CommandConfig, Verb};
use crate::output::table::{col, TableSpec};

pub const IMAGES: TableSpec = TableSpec {
    root: "items",
    columns: &[
        col("Id", "id"),
        col("Name", "properties.name"),
        col("Location", "properties.location"),
        col("Size", "properties.size"),
        col("LicenceType", "properties.licenceType"),
        col("ImageType", "properties.imageType"),
        col("Public", "properties.public"),
        col("CloudInit", "properties.cloudInit"),
        col("Description", "properties.description"),
        col("State", "metadata.state"),
    ],
    defaults: &["Id", "Name", "Location", "LicenceType", "ImageType", "Public"],
};

#[derive(Args, Debug)]
pub struct ImageArgs {
    #[command(subcommand)]
    pub command: ImageCommand,
}

#[derive(Subcommand, Debug)]
pub enum ImageCommand {
    /// List images
    #[command(visible_alias = "ls")]
    List(ListArgs),
    /// Get an image
    #[command(visible_alias = "g")]
    Get(GetArgs),
    /// Update an image
    #[command(visible_alias = "u")]
    Update(UpdateArgs),
    /// Delete an image, or all private images
    #[command(visible_alias = "d")]
    Delete(DeleteArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only images in this location, e.g. de/fra
    #[arg(long = "filter.location")]
    pub filter_location: Option<String>,

    /// Only images with this licence type, e.g. LINUX
    #[arg(long = "filter.licence-type")]
    pub filter_licence_type: Option<String>,

    /// Only HDD or CDROM images
    #[arg(long = "filter.image-type")]
    pub filter_image_type: Option<String>,

    /// Return at most this many images after filtering
    #[arg(long)]
    pub max_results: Option<u32>,

    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Image ID
    #[arg(short = 'i', long, add = complete(Resource::Images))]
    pub image_id: Option<String>,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Image ID
    #[arg(short = 'i', long, add = complete(Resource::Images))]
    pub image_id: Option<String>,

    #[arg(short = 'n', long)]
    pub name: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// LINUX, RHEL, WINDOWS, WINDOWS2016, WINDOWS2022, UNKNOWN or OTHER
    #[arg(long)]
    pub licence_type: Option<String>,

    /// NONE or V1
    #[arg(long)]
    pub cloud_init: Option<String>,

    #[command(flatten)]
    pub wait: WaitArgs,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Image ID
    #[arg(short = 'i', long, add = complete(Resource::Images))]
    pub image_id: Option<String>,

    /// Delete every non-public image
    #[arg(short = 'a', long)]
    pub all: bool,

    #[command(flatten)]
    pub wait: WaitArgs,
}

pub async fn execute_image(c: &CommandConfig<'_>, args: ImageArgs) -> Result<()> {
    match args.command {
        ImageCommand::List(a) => execute(&a, c).await,
        ImageCommand::Get(a) => execute(&a, c).await,
        ImageCommand::Update(a) => execute(&a, c).await,
        ImageCommand::Delete(a) => execute(&a, c).await,
    }
}

fn image_path(id: &str) -> String {
    format!("/images/{}", id)
}

/// Public images belong to IONOS and cannot be deleted
pub fn is_private(image: &Value) -> bool {
    image["properties"]["public"] != json!(true)
}

impl Verb for ListArgs {
    async fn run(&self, c: &CommandConfig<'_>) -> Result<()> {
        let filters = [
            query::filter_by("location", self.filter_location.clone()),
            query::filter_by("licenceType", self.filter_licence_type.clone()),
            query::filter_by("imageType", self.filter_image_type.clone()),
            query::max_results(self.max_results),
        ]
        .into_iter()
        .flatten()
        .chain(self.page.filters())
        .chain([query::depth(1)]);

        let response = c
            .client(Product::Compute)?
            .list(ListRequest::new("/images").apply(filters))
            .await?;
        c.printer().print(&response.body, &IMAGES)
    }
}

impl Verb for GetArgs {
    fn pre_run(&self, c: &CommandConfig<'_>) -> Result<()> {
        c.check_required_flags(&["image-id"])
    }

    async fn run(&self, c: &CommandConfig<'_>) -> Result<()> {
        let id = self.image_id.as_deref().unwrap_or_default();
        common::get_one(c, Product::Compute, "/images", id, "image", &IMAGES).await
    }
}

impl Verb for UpdateArgs {
    fn pre_run(&self, c: &CommandConfig<'_>) -> Result<()> {
        c.check_required_flags(&["image-id"])
    }

    async fn run(&self, c: &CommandConfig<'_>) -> Result<()> {
        let id = self.image_id.as_deref().unwrap_or_default();

        let mut properties = serde_json::Map::new();
        let changes = [
            ("name", &self.name),
            ("description", &self.description),
            ("licenceType", &self.licence_type),
            ("cloudInit", &self.cloud_init),
        ];
        for (key, value) in changes {
            if let Some(v) = value {
                properties.insert(key.to_string(), json!(v));
            }
        }

        let client = c.client(Product::Compute)?;
        let response = client
            .patch(&image_path(id), Value::Object(properties))
            .await?;
        self.wait.settle(c, &client, &response).await?;

        c.printer().print(&response.body, &IMAGES.at(""))
    }
}

impl Verb for DeleteArgs {
    fn pre_run(&self, c: &CommandConfig<'_>) -> Result<()> {
        common::require_id_or_all(c, "image-id")
    }

    async fn run(&self, c: &CommandConfig<'_>) -> Result<()> {
        let client = c.client(Product::Compute)?;
        let ids = match (&self.image_id, self.all) {
            (Some(id), false) => vec![id.clone()],
            _ => {
                let request = ListRequest::new("/images").apply([query::depth(1)]);
                common::all_ids(&client, request, is_private).await?
            }
        };

        common::delete_each(c, "image(s)", ids, |id| {
            let client = &client;
            async move {
                let response = client.delete(&image_path(&id)).await?;
                self.wait.settle(c, client, &response).await
            }
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_images_are_skipped() {
        let list = json!({"items": [
            {"id": "ubuntu", "properties": {"public": true}},
            {"id": "mine", "properties": {"public": false}},
            {"id": "legacy", "properties": {}}
        ]});
        assert_eq!(common::ids_of(&list, is_private), vec!["mine", "legacy"]);
    }
}
