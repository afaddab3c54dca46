//! Entity ↔ DTO mapping
//!
//! Mappers are stateless unit structs. `to_entity` never carries the
//! client-supplied id; `merge_to_entity` overlays only the fields the DTO
//! actually sets and leaves the stored id alone.

use serde::de::DeserializeOwned;
use serde::Serialize;

/// A persisted record identified by a server-assigned id
pub trait Record: Clone + Send + Sync + 'static {
    fn id(&self) -> Option<i64>;

    /// Same record with the given id
    fn with_id(self, id: i64) -> Self;
}

/// Converter between one entity family and its wire shape
pub trait Mapper: Send + Sync + 'static {
    type Entity: Record;
    type Dto: Serialize + DeserializeOwned + Clone + Send + Sync + 'static;

    /// Every field, including id
    fn to_dto(entity: &Self::Entity) -> Self::Dto;

    /// Every field except id
    fn to_entity(dto: &Self::Dto) -> Self::Entity;

    /// Overlay the DTO's `Some` fields onto the entity
    fn merge_to_entity(dto: &Self::Dto, entity: Self::Entity) -> Self::Entity;

    fn map_to_dto(entity: Option<&Self::Entity>) -> Option<Self::Dto> {
        entity.map(Self::to_dto)
    }

    fn map_to_entity(dto: Option<&Self::Dto>) -> Option<Self::Entity> {
        dto.map(Self::to_entity)
    }

    /// Absent DTO leaves the entity untouched
    fn merge_optional(dto: Option<&Self::Dto>, entity: Self::Entity) -> Self::Entity {
        match dto {
            Some(dto) => Self::merge_to_entity(dto, entity),
            None => entity,
        }
    }

    /// Element-wise, order preserving
    fn to_dto_list(entities: Option<&[Self::Entity]>) -> Option<Vec<Self::Dto>> {
        entities.map(|entities| entities.iter().map(Self::to_dto).collect())
    }
}

/// `Some` wins, `None` keeps the current value
pub fn overlay<T: Clone>(current: Option<T>, incoming: &Option<T>) -> Option<T> {
    match incoming {
        Some(value) => Some(value.clone()),
        None => current,
    }
}

/// Implements [`Record`] and [`Mapper`] for a flat entity/DTO pair whose
/// fields share names and are all `Option`s.
macro_rules! field_mapper {
    ($mapper:ident, $entity:ident, $dto:ident, [$($field:ident),+ $(,)?]) => {
        impl $crate::crud::Record for $entity {
            fn id(&self) -> Option<i64> {
                self.id
            }

            fn with_id(mut self, id: i64) -> Self {
                self.id = Some(id);
                self
            }
        }

        pub struct $mapper;

        impl $crate::crud::Mapper for $mapper {
            type Entity = $entity;
            type Dto = $dto;

            fn to_dto(entity: &$entity) -> $dto {
                $dto {
                    id: entity.id,
                    $($field: entity.$field.clone(),)+
                }
            }

            fn to_entity(dto: &$dto) -> $entity {
                $entity {
                    id: None,
                    $($field: dto.$field.clone(),)+
                }
            }

            fn merge_to_entity(dto: &$dto, entity: $entity) -> $entity {
                $entity {
                    id: entity.id,
                    $($field: $crate::crud::mapper::overlay(entity.$field, &dto.$field),)+
                }
            }
        }
    };
}

pub(crate) use field_mapper;
