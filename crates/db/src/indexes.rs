use bson::Document;
use mongodb::{Database, IndexModel, options::IndexOptions};
use tracing::info;

use crate::models::{
    Invitation, InvitationStatus, Organization, OrganizationMember, Store, StoreAssignment, User,
    VerificationCode,
};

pub async fn ensure_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    // Users
    create_indexes(
        db,
        User::COLLECTION,
        vec![
            index_unique_sparse(bson::doc! { "email": 1 }),
            index_unique(bson::doc! { "phone": 1 }),
        ],
    )
    .await?;

    // Organizations
    create_indexes(
        db,
        Organization::COLLECTION,
        vec![index(bson::doc! { "name": 1 })],
    )
    .await?;

    // Organization Members
    create_indexes(
        db,
        OrganizationMember::COLLECTION,
        vec![
            index_unique(bson::doc! { "organization_id": 1, "user_id": 1 }),
            index(bson::doc! { "user_id": 1 }),
        ],
    )
    .await?;

    // Invitations. The partial unique index allows a single pending invitation
    // per (email, organization); concurrent creates lose with a duplicate key.
    create_indexes(
        db,
        Invitation::COLLECTION,
        vec![
            index_unique(bson::doc! { "token": 1 }),
            index_unique_where(
                bson::doc! { "email": 1, "organization_id": 1 },
                bson::doc! { "status": InvitationStatus::Pending.as_str() },
            ),
            index(bson::doc! { "organization_id": 1, "status": 1 }),
            index(bson::doc! { "expires_at": 1 }),
        ],
    )
    .await?;

    // Stores
    create_indexes(
        db,
        Store::COLLECTION,
        vec![index_unique(bson::doc! { "organization_id": 1, "name": 1 })],
    )
    .await?;

    // User-store assignments
    create_indexes(
        db,
        StoreAssignment::COLLECTION,
        vec![
            index_unique(bson::doc! { "user_id": 1, "store_id": 1 }),
            index(bson::doc! { "store_id": 1 }),
        ],
    )
    .await?;

    // Verification codes
    create_indexes(
        db,
        VerificationCode::COLLECTION,
        vec![
            index(bson::doc! { "phone": 1, "is_used": 1 }),
            index(bson::doc! { "expires_at": 1 }),
        ],
    )
    .await?;

    info!("All indexes ensured");
    Ok(())
}

fn index(keys: Document) -> IndexModel {
    IndexModel::builder().keys(keys).build()
}

fn index_unique(keys: Document) -> IndexModel {
    IndexModel::builder()
        .keys(keys)
        .options(IndexOptions::builder().unique(true).build())
        .build()
}

fn index_unique_sparse(keys: Document) -> IndexModel {
    IndexModel::builder()
        .keys(keys)
        .options(IndexOptions::builder().unique(true).sparse(true).build())
        .build()
}

fn index_unique_where(keys: Document, filter: Document) -> IndexModel {
    IndexModel::builder()
        .keys(keys)
        .options(
            IndexOptions::builder()
                .unique(true)
                .partial_filter_expression(filter)
                .build(),
        )
        .build()
}

async fn create_indexes(
    db: &Database,
    collection: &str,
    indexes: Vec<IndexModel>,
) -> Result<(), mongodb::error::Error> {
    db.collection::<Document>(collection)
        .create_indexes(indexes)
        .await?;
    info!(collection, "Indexes created");
    Ok(())
}
