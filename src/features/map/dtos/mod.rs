mod map_dto;

pub use map_dto::{MapCityDto, MapLanguageDto, MapPointDto, MapViewDto};
