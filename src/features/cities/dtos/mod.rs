mod city_dto;

pub use city_dto::{
    AccessibleCityDto, CityResponseDto, CreateCityDto, MemberResponseDto, MembershipResponseDto,
    OperatorLandingDto, UpsertMemberDto,
};
