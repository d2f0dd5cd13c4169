use mongodb::{Client, Collection, Database};
use std::error::Error;

#[derive(Clone)]
pub struct MongoDB {
    client: Client,
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str) -> Result<Self, Box<dyn Error>> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        // Connection pool
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(5);
        client_options.max_idle_time = Some(std::time::Duration::from_secs(300));

        client_options.connect_timeout = Some(std::time::Duration::from_secs(5));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));

        let client = Client::with_options(client_options)?;

        // Extract database name from URI or use default
        let db_name = uri
            .split('/')
            .last()
            .and_then(|s| s.split('?').next())
            .filter(|s| !s.is_empty())
            .unwrap_or("RedLifeDB");

        let db = client.database(db_name);

        // Test connection
        db.list_collection_names().await?;

        let mongodb = Self { client, db };

        mongodb.ensure_indexes().await?;

        Ok(mongodb)
    }

    /// Creates necessary indexes for optimal query performance
    async fn ensure_indexes(&self) -> Result<(), Box<dyn Error>> {
        use mongodb::bson::doc;
        use mongodb::options::IndexOptions;
        use mongodb::IndexModel;

        log::info!("🔧 Creating database indexes...");

        // users(email) único - email é a chave natural do usuário
        let users = self.database().collection::<mongodb::bson::Document>("users");

        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        match users.create_index(email_index).await {
            Ok(_) => log::info!("   ✅ Index created: users(email) unique"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        // users(bloodGroup, district, upazila) - busca de doadores
        let donor_search_index = IndexModel::builder()
            .keys(doc! { "bloodGroup": 1, "district": 1, "upazila": 1 })
            .build();

        match users.create_index(donor_search_index).await {
            Ok(_) => log::info!("   ✅ Index created: users(bloodGroup, district, upazila)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        // Donation(requesterEmail, donationStatus) - listas "meus pedidos"
        let donations = self.database().collection::<mongodb::bson::Document>("Donation");

        let requester_index = IndexModel::builder()
            .keys(doc! { "requesterEmail": 1, "donationStatus": 1 })
            .build();

        match donations.create_index(requester_index).await {
            Ok(_) => log::info!("   ✅ Index created: Donation(requesterEmail, donationStatus)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        // Donation(donationStatus, donationDate) - listas públicas filtradas/ordenadas
        let status_date_index = IndexModel::builder()
            .keys(doc! { "donationStatus": 1, "donationDate": 1 })
            .build();

        match donations.create_index(status_date_index).await {
            Ok(_) => log::info!("   ✅ Index created: Donation(donationStatus, donationDate)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        // Funds(fundDate) - lista paginada em ordem decrescente
        let funds = self.database().collection::<mongodb::bson::Document>("Funds");

        let fund_date_index = IndexModel::builder()
            .keys(doc! { "fundDate": -1 })
            .build();

        match funds.create_index(fund_date_index).await {
            Ok(_) => log::info!("   ✅ Index created: Funds(fundDate)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        // Blogs(status) - filtro draft/published
        let blogs = self.database().collection::<mongodb::bson::Document>("Blogs");

        let blog_status_index = IndexModel::builder()
            .keys(doc! { "status": 1 })
            .build();

        match blogs.create_index(blog_status_index).await {
            Ok(_) => log::info!("   ✅ Index created: Blogs(status)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        log::info!("✅ Database indexes ready");

        Ok(())
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}
