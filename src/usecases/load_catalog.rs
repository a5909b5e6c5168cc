use crate::{
    domain::catalog::{find_category, find_type, Category, TransactionType},
    usecases::contracts::{CatalogSource, SourceError},
};

/// Categories and transaction types offered when entering a transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    pub categories: Vec<Category>,
    pub types: Vec<TransactionType>,
}

impl Catalog {
    /// Maps a category given by id or name to its id.
    pub fn category_id(&self, needle: &str) -> Option<String> {
        find_category(&self.categories, needle).map(|category| category.id.clone())
    }

    /// Maps a transaction type given by id or name to its id.
    pub fn type_id(&self, needle: &str) -> Option<String> {
        find_type(&self.types, needle).map(|item| item.id.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadCatalogError {
    TemporarilyUnavailable,
    DataContractViolation,
}

pub fn load_catalog(source: &dyn CatalogSource) -> Result<Catalog, LoadCatalogError> {
    let categories = source.categories().map_err(map_source_error)?;
    let types = source.transaction_types().map_err(map_source_error)?;

    Ok(Catalog { categories, types })
}

fn map_source_error(error: SourceError) -> LoadCatalogError {
    match error {
        SourceError::Unavailable | SourceError::Rejected { .. } => {
            LoadCatalogError::TemporarilyUnavailable
        }
        SourceError::InvalidData => LoadCatalogError::DataContractViolation,
    }
}
