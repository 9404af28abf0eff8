use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260101_000001_create_users_table::Migration),
            Box::new(m20260101_000002_create_master_tables::Migration),
            Box::new(m20260101_000003_create_job_cards_table::Migration),
            Box::new(m20260101_000004_create_inquiries_table::Migration),
            Box::new(m20260101_000005_create_invoices_table::Migration),
            Box::new(m20260101_000006_create_appointments_table::Migration),
            Box::new(m20260101_000007_create_sequences_table::Migration),
        ]
    }
}

mod m20260101_000001_create_users_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20260101_000001_create_users_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Users::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                        .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                        .col(ColumnDef::new(Users::Name).string().null())
                        .col(
                            ColumnDef::new(Users::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Users::UpdatedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Users {
        Table,
        Id,
        Email,
        PasswordHash,
        Name,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20260101_000002_create_master_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20260101_000002_create_master_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(ServiceMasters::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ServiceMasters::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ServiceMasters::Name).string().not_null())
                        .col(
                            ColumnDef::new(ServiceMasters::PricingByVehicleType)
                                .json()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ServiceMasters::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ServiceMasters::UpdatedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(PpfMasters::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(PpfMasters::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(PpfMasters::Name).string().not_null())
                        .col(
                            ColumnDef::new(PpfMasters::PricingByVehicleType)
                                .json()
                                .not_null(),
                        )
                        .col(ColumnDef::new(PpfMasters::Rolls).json().not_null())
                        .col(
                            ColumnDef::new(PpfMasters::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PpfMasters::UpdatedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(AccessoryCategories::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(AccessoryCategories::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(AccessoryCategories::Name)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(AccessoryCategories::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(AccessoryMasters::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(AccessoryMasters::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(AccessoryMasters::Category).string().not_null())
                        .col(ColumnDef::new(AccessoryMasters::Name).string().not_null())
                        .col(
                            ColumnDef::new(AccessoryMasters::Quantity)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(AccessoryMasters::Price)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(AccessoryMasters::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(AccessoryMasters::UpdatedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_accessory_masters_category")
                        .table(AccessoryMasters::Table)
                        .col(AccessoryMasters::Category)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(VehicleTypes::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(VehicleTypes::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(VehicleTypes::Name).string().not_null())
                        .col(
                            ColumnDef::new(VehicleTypes::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Technicians::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Technicians::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Technicians::Name).string().not_null())
                        .col(ColumnDef::new(Technicians::Specialty).string().not_null())
                        .col(ColumnDef::new(Technicians::Phone).string().null())
                        .col(
                            ColumnDef::new(Technicians::Status)
                                .string_len(32)
                                .not_null()
                                .default("active"),
                        )
                        .col(
                            ColumnDef::new(Technicians::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Technicians::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(VehicleTypes::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(AccessoryMasters::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(AccessoryCategories::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(PpfMasters::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(ServiceMasters::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum ServiceMasters {
        Table,
        Id,
        Name,
        PricingByVehicleType,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum PpfMasters {
        Table,
        Id,
        Name,
        PricingByVehicleType,
        Rolls,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum AccessoryCategories {
        Table,
        Id,
        Name,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum AccessoryMasters {
        Table,
        Id,
        Category,
        Name,
        Quantity,
        Price,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum VehicleTypes {
        Table,
        Id,
        Name,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum Technicians {
        Table,
        Id,
        Name,
        Specialty,
        Phone,
        Status,
        CreatedAt,
    }
}

mod m20260101_000003_create_job_cards_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20260101_000003_create_job_cards_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(JobCards::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(JobCards::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(JobCards::JobNo).string().not_null().unique_key())
                        .col(ColumnDef::new(JobCards::CustomerName).string().not_null())
                        .col(ColumnDef::new(JobCards::PhoneNumber).string().not_null())
                        .col(ColumnDef::new(JobCards::EmailAddress).string().null())
                        .col(ColumnDef::new(JobCards::ReferralSource).string().not_null())
                        .col(ColumnDef::new(JobCards::ReferrerName).string().null())
                        .col(ColumnDef::new(JobCards::ReferrerPhone).string().null())
                        .col(ColumnDef::new(JobCards::Make).string().not_null())
                        .col(ColumnDef::new(JobCards::Model).string().not_null())
                        .col(ColumnDef::new(JobCards::Year).string().not_null())
                        .col(ColumnDef::new(JobCards::LicensePlate).string().not_null())
                        .col(ColumnDef::new(JobCards::Vin).string().null())
                        .col(ColumnDef::new(JobCards::VehicleType).string().null())
                        .col(ColumnDef::new(JobCards::Services).json().not_null())
                        .col(ColumnDef::new(JobCards::Ppfs).json().not_null())
                        .col(ColumnDef::new(JobCards::Accessories).json().not_null())
                        .col(
                            ColumnDef::new(JobCards::LaborCharge)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(JobCards::Discount)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(JobCards::Gst).decimal().not_null().default(18))
                        .col(ColumnDef::new(JobCards::ServiceNotes).text().null())
                        .col(
                            ColumnDef::new(JobCards::Status)
                                .string_len(32)
                                .not_null()
                                .default("Pending"),
                        )
                        .col(ColumnDef::new(JobCards::Technician).string().null())
                        .col(
                            ColumnDef::new(JobCards::EstimatedCost)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(JobCards::Date)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(JobCards::UpdatedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_job_cards_status")
                        .table(JobCards::Table)
                        .col(JobCards::Status)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_job_cards_date")
                        .table(JobCards::Table)
                        .col(JobCards::Date)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(JobCards::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum JobCards {
        Table,
        Id,
        JobNo,
        CustomerName,
        PhoneNumber,
        EmailAddress,
        ReferralSource,
        ReferrerName,
        ReferrerPhone,
        Make,
        Model,
        Year,
        LicensePlate,
        Vin,
        VehicleType,
        Services,
        Ppfs,
        Accessories,
        LaborCharge,
        Discount,
        Gst,
        ServiceNotes,
        Status,
        Technician,
        EstimatedCost,
        Date,
        UpdatedAt,
    }
}

mod m20260101_000004_create_inquiries_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20260101_000004_create_inquiries_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Inquiries::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Inquiries::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Inquiries::InquiryId).string().not_null())
                        .col(ColumnDef::new(Inquiries::CustomerName).string().not_null())
                        .col(ColumnDef::new(Inquiries::Phone).string().not_null())
                        .col(ColumnDef::new(Inquiries::Email).string().null())
                        .col(ColumnDef::new(Inquiries::Services).json().not_null())
                        .col(ColumnDef::new(Inquiries::Accessories).json().not_null())
                        .col(ColumnDef::new(Inquiries::Notes).text().null())
                        .col(
                            ColumnDef::new(Inquiries::OurPrice)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Inquiries::CustomerPrice)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Inquiries::Date)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Inquiries::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Inquiries {
        Table,
        Id,
        InquiryId,
        CustomerName,
        Phone,
        Email,
        Services,
        Accessories,
        Notes,
        OurPrice,
        CustomerPrice,
        Date,
    }
}

mod m20260101_000005_create_invoices_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20260101_000005_create_invoices_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Invoices::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Invoices::Id).uuid().primary_key().not_null())
                        .col(
                            ColumnDef::new(Invoices::InvoiceNo)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(Invoices::JobCardId)
                                .uuid()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Invoices::JobNo).string().not_null())
                        .col(ColumnDef::new(Invoices::Business).string().not_null())
                        .col(ColumnDef::new(Invoices::CustomerName).string().not_null())
                        .col(ColumnDef::new(Invoices::PhoneNumber).string().not_null())
                        .col(ColumnDef::new(Invoices::VehicleInfo).string().not_null())
                        .col(ColumnDef::new(Invoices::Items).json().not_null())
                        .col(ColumnDef::new(Invoices::LaborCharge).decimal().not_null())
                        .col(ColumnDef::new(Invoices::Discount).decimal().not_null())
                        .col(ColumnDef::new(Invoices::Subtotal).decimal().not_null())
                        .col(ColumnDef::new(Invoices::Gst).decimal().not_null())
                        .col(ColumnDef::new(Invoices::GstAmount).decimal().not_null())
                        .col(ColumnDef::new(Invoices::Total).decimal().not_null())
                        .col(
                            ColumnDef::new(Invoices::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_invoices_business")
                        .table(Invoices::Table)
                        .col(Invoices::Business)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Invoices::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Invoices {
        Table,
        Id,
        InvoiceNo,
        JobCardId,
        JobNo,
        Business,
        CustomerName,
        PhoneNumber,
        VehicleInfo,
        Items,
        LaborCharge,
        Discount,
        Subtotal,
        Gst,
        GstAmount,
        Total,
        CreatedAt,
    }
}

mod m20260101_000006_create_appointments_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20260101_000006_create_appointments_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Appointments::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Appointments::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Appointments::CustomerName).string().not_null())
                        .col(ColumnDef::new(Appointments::Phone).string().not_null())
                        .col(ColumnDef::new(Appointments::VehicleInfo).string().not_null())
                        .col(ColumnDef::new(Appointments::ServiceType).string().not_null())
                        .col(ColumnDef::new(Appointments::Date).date().not_null())
                        .col(ColumnDef::new(Appointments::Time).string_len(8).not_null())
                        .col(
                            ColumnDef::new(Appointments::Status)
                                .string_len(32)
                                .not_null()
                                .default("SCHEDULED"),
                        )
                        .col(ColumnDef::new(Appointments::CancelReason).string().null())
                        .col(
                            ColumnDef::new(Appointments::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Appointments::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Appointments {
        Table,
        Id,
        CustomerName,
        Phone,
        VehicleInfo,
        ServiceType,
        Date,
        Time,
        Status,
        CancelReason,
        CreatedAt,
    }
}

mod m20260101_000007_create_sequences_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20260101_000007_create_sequences_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // One row per (counter, year), e.g. "job_card:2026"
            manager
                .create_table(
                    Table::create()
                        .table(Sequences::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Sequences::Name)
                                .string()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Sequences::LastValue)
                                .big_integer()
                                .not_null()
                                .default(0),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Sequences::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Sequences {
        Table,
        Name,
        LastValue,
    }
}
