mod language_dto;
mod point_dto;

pub use language_dto::{CreateLanguageDto, LanguageResponseDto, UpdateLanguageDto};
pub use point_dto::{CreatePointDto, PointResponseDto};
