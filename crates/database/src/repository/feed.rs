//! Fodder crops, purchased feed and daily feed consumption.

use super::codec::{self, decimal, variant};
use super::{ChildLink, DbRepository, DeleteSummary, SqliteQuery};
use crate::error::DbError;
use crate::schema::{FEED_CONSUMPTION, FEED_INVENTORY, FODDER_CULTIVATION};
use core_types::{
    FeedConsumption, FeedInventory, FodderCultivation, NewFeedConsumption, NewFeedInventory,
    NewFodderCultivation, RecordFilter,
};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

const INSERT_FODDER: &str = r#"
INSERT INTO fodder_cultivation (crop_type, plot_id, area_acres, sowing_date, harvest_date, yield_kg, cost, status, notes)
VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
"#;

const UPDATE_FODDER: &str = r#"
UPDATE fodder_cultivation
SET crop_type = ?, plot_id = ?, area_acres = ?, sowing_date = ?, harvest_date = ?, yield_kg = ?,
    cost = ?, status = ?, notes = ?
WHERE id = ?
"#;

const INSERT_FEED: &str = r#"
INSERT INTO feed_inventory (feed_name, category, quantity_kg, unit_cost, purchase_date, expiry_date, supplier, notes)
VALUES (?, ?, ?, ?, ?, ?, ?, ?)
"#;

const UPDATE_FEED: &str = r#"
UPDATE feed_inventory
SET feed_name = ?, category = ?, quantity_kg = ?, unit_cost = ?, purchase_date = ?, expiry_date = ?,
    supplier = ?, notes = ?
WHERE id = ?
"#;

const INSERT_CONSUMPTION: &str = r#"
INSERT INTO feed_consumption (feed_id, date, quantity_kg, herd_size, notes)
VALUES (?, ?, ?, ?, ?)
"#;

const UPDATE_CONSUMPTION: &str = r#"
UPDATE feed_consumption
SET feed_id = ?, date = ?, quantity_kg = ?, herd_size = ?, notes = ?
WHERE id = ?
"#;

impl DbRepository {
    // --- Fodder cultivation ---

    pub async fn create_fodder(&self, crop: &NewFodderCultivation) -> Result<i64, DbError> {
        crop.validate()?;
        let query = bind_fodder(sqlx::query(INSERT_FODDER), crop);
        self.insert_row(&FODDER_CULTIVATION, &[], query).await
    }

    /// Date bounds apply to the sowing date.
    pub async fn get_fodders(
        &self,
        filter: &RecordFilter,
    ) -> Result<Vec<FodderCultivation>, DbError> {
        self.fetch_filtered(&FODDER_CULTIVATION, filter, decode_fodder)
            .await
    }

    pub async fn get_fodder(&self, id: i64) -> Result<FodderCultivation, DbError> {
        self.fetch_by_id(&FODDER_CULTIVATION, id, decode_fodder)
            .await
    }

    pub async fn update_fodder(&self, id: i64, crop: &NewFodderCultivation) -> Result<(), DbError> {
        crop.validate()?;
        let query = bind_fodder(sqlx::query(UPDATE_FODDER), crop).bind(id);
        self.update_row(&FODDER_CULTIVATION, id, &[], query).await
    }

    pub async fn delete_fodder(&self, id: i64) -> Result<DeleteSummary, DbError> {
        self.delete_with_children(&FODDER_CULTIVATION, id, &[])
            .await
    }

    // --- Feed inventory ---

    pub async fn create_feed(&self, feed: &NewFeedInventory) -> Result<i64, DbError> {
        feed.validate()?;
        let query = bind_feed(sqlx::query(INSERT_FEED), feed);
        self.insert_row(&FEED_INVENTORY, &[], query).await
    }

    /// Date bounds apply to the purchase date.
    pub async fn get_feeds(&self, filter: &RecordFilter) -> Result<Vec<FeedInventory>, DbError> {
        self.fetch_filtered(&FEED_INVENTORY, filter, decode_feed)
            .await
    }

    pub async fn get_feed(&self, id: i64) -> Result<FeedInventory, DbError> {
        self.fetch_by_id(&FEED_INVENTORY, id, decode_feed).await
    }

    pub async fn update_feed(&self, id: i64, feed: &NewFeedInventory) -> Result<(), DbError> {
        feed.validate()?;
        let query = bind_feed(sqlx::query(UPDATE_FEED), feed).bind(id);
        self.update_row(&FEED_INVENTORY, id, &[], query).await
    }

    /// Deletes a feed lot. With the default policy this is refused while any
    /// consumption row still references the lot.
    pub async fn delete_feed(&self, id: i64) -> Result<DeleteSummary, DbError> {
        let links = [ChildLink::new(
            &FEED_CONSUMPTION,
            "feed_id",
            self.cascade.feed_consumption,
        )];
        self.delete_with_children(&FEED_INVENTORY, id, &links).await
    }

    // --- Feed consumption ---

    pub async fn create_feed_consumption(
        &self,
        usage: &NewFeedConsumption,
    ) -> Result<i64, DbError> {
        usage.validate()?;
        let query = bind_consumption(sqlx::query(INSERT_CONSUMPTION), usage);
        self.insert_row(&FEED_CONSUMPTION, &[(&FEED_INVENTORY, usage.feed_id)], query)
            .await
    }

    pub async fn get_feed_consumptions(
        &self,
        filter: &RecordFilter,
    ) -> Result<Vec<FeedConsumption>, DbError> {
        self.fetch_filtered(&FEED_CONSUMPTION, filter, decode_consumption)
            .await
    }

    pub async fn get_feed_consumption(&self, id: i64) -> Result<FeedConsumption, DbError> {
        self.fetch_by_id(&FEED_CONSUMPTION, id, decode_consumption)
            .await
    }

    pub async fn update_feed_consumption(
        &self,
        id: i64,
        usage: &NewFeedConsumption,
    ) -> Result<(), DbError> {
        usage.validate()?;
        let query = bind_consumption(sqlx::query(UPDATE_CONSUMPTION), usage).bind(id);
        self.update_row(
            &FEED_CONSUMPTION,
            id,
            &[(&FEED_INVENTORY, usage.feed_id)],
            query,
        )
        .await
    }

    pub async fn delete_feed_consumption(&self, id: i64) -> Result<DeleteSummary, DbError> {
        self.delete_with_children(&FEED_CONSUMPTION, id, &[]).await
    }
}

fn bind_fodder<'q>(query: SqliteQuery<'q>, crop: &'q NewFodderCultivation) -> SqliteQuery<'q> {
    query
        .bind(crop.crop_type.trim())
        .bind(crop.plot_id.trim())
        .bind(codec::text(crop.area_acres))
        .bind(crop.sowing_date)
        .bind(crop.harvest_date)
        .bind(codec::text(crop.yield_kg))
        .bind(codec::text(crop.cost))
        .bind(crop.status.as_str())
        .bind(crop.notes.as_deref())
}

fn decode_fodder(row: &SqliteRow) -> Result<FodderCultivation, DbError> {
    Ok(FodderCultivation {
        id: row.try_get("id")?,
        crop_type: row.try_get("crop_type")?,
        plot_id: row.try_get("plot_id")?,
        area_acres: decimal(row, "area_acres")?,
        sowing_date: row.try_get("sowing_date")?,
        harvest_date: row.try_get("harvest_date")?,
        yield_kg: decimal(row, "yield_kg")?,
        cost: decimal(row, "cost")?,
        status: variant(row, "status")?,
        notes: row.try_get("notes")?,
    })
}

fn bind_feed<'q>(query: SqliteQuery<'q>, feed: &'q NewFeedInventory) -> SqliteQuery<'q> {
    query
        .bind(feed.feed_name.trim())
        .bind(feed.category.trim())
        .bind(codec::text(feed.quantity_kg))
        .bind(codec::text(feed.unit_cost))
        .bind(feed.purchase_date)
        .bind(feed.expiry_date)
        .bind(feed.supplier.as_deref())
        .bind(feed.notes.as_deref())
}

fn decode_feed(row: &SqliteRow) -> Result<FeedInventory, DbError> {
    Ok(FeedInventory {
        id: row.try_get("id")?,
        feed_name: row.try_get("feed_name")?,
        category: row.try_get("category")?,
        quantity_kg: decimal(row, "quantity_kg")?,
        unit_cost: decimal(row, "unit_cost")?,
        purchase_date: row.try_get("purchase_date")?,
        expiry_date: row.try_get("expiry_date")?,
        supplier: row.try_get("supplier")?,
        notes: row.try_get("notes")?,
    })
}

fn bind_consumption<'q>(
    query: SqliteQuery<'q>,
    usage: &'q NewFeedConsumption,
) -> SqliteQuery<'q> {
    query
        .bind(usage.feed_id)
        .bind(usage.date)
        .bind(codec::text(usage.quantity_kg))
        .bind(usage.herd_size)
        .bind(usage.notes.as_deref())
}

fn decode_consumption(row: &SqliteRow) -> Result<FeedConsumption, DbError> {
    Ok(FeedConsumption {
        id: row.try_get("id")?,
        feed_id: row.try_get("feed_id")?,
        date: row.try_get("date")?,
        quantity_kg: decimal(row, "quantity_kg")?,
        herd_size: row.try_get("herd_size")?,
        notes: row.try_get("notes")?,
    })
}
