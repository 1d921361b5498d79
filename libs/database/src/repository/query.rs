use sea_orm::sea_query::{IntoCondition, Order};
use sea_orm::{Condition, EntityTrait, QueryFilter, QueryOrder, Select};

use super::IncludePaths;

/// Filter, ordering and eager-loading for [`BaseRepository::get_all`].
///
/// [`BaseRepository::get_all`]: super::BaseRepository::get_all
pub struct QueryOptions<E: EntityTrait> {
    filter: Option<Condition>,
    order: Vec<(E::Column, Order)>,
    include: IncludePaths,
}

impl<E: EntityTrait> Default for QueryOptions<E> {
    fn default() -> Self {
        Self {
            filter: None,
            order: Vec::new(),
            include: IncludePaths::none(),
        }
    }
}

impl<E: EntityTrait> QueryOptions<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a predicate; repeated calls are AND-ed together.
    pub fn filter<F: IntoCondition>(mut self, filter: F) -> Self {
        let condition = filter.into_condition();
        self.filter = Some(match self.filter.take() {
            Some(existing) => existing.add(condition),
            None => Condition::all().add(condition),
        });
        self
    }

    /// Orders by `column` ascending, after any ordering already added.
    pub fn order_by_asc(mut self, column: E::Column) -> Self {
        self.order.push((column, Order::Asc));
        self
    }

    pub fn order_by_desc(mut self, column: E::Column) -> Self {
        self.order.push((column, Order::Desc));
        self
    }

    pub fn include(mut self, paths: impl Into<IncludePaths>) -> Self {
        self.include = paths.into();
        self
    }

    pub(crate) fn into_select(self) -> (Select<E>, IncludePaths) {
        let mut select = E::find();
        if let Some(filter) = self.filter {
            select = select.filter(filter);
        }
        for (column, order) in self.order {
            select = select.order_by(column, order);
        }
        (select, self.include)
    }
}
