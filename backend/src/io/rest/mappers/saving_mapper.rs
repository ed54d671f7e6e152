use shared::{Saving, SavingType};

use crate::domain::models::{Saving as DomainSaving, SavingType as DomainSavingType};

pub struct SavingMapper;

impl SavingMapper {
    pub fn saving_type_to_dto(saving_type: DomainSavingType) -> SavingType {
        match saving_type {
            DomainSavingType::Goal => SavingType::Goal,
            DomainSavingType::Contribution => SavingType::Contribution,
        }
    }

    /// Convert a domain saving to the shared DTO
    pub fn to_dto(saving: &DomainSaving) -> Saving {
        Saving {
            id: saving.id.clone(),
            title: saving.title.clone(),
            amount: saving.amount,
            saving_type: Self::saving_type_to_dto(saving.saving_type),
            date: saving.date.to_rfc3339(),
        }
    }

    pub fn to_dto_list(savings: &[DomainSaving]) -> Vec<Saving> {
        savings.iter().map(Self::to_dto).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_to_dto() {
        let saving = DomainSaving {
            id: "sav-1".to_string(),
            title: "Phone".to_string(),
            amount: 100.0,
            saving_type: DomainSavingType::Contribution,
            date: Utc.with_ymd_and_hms(2025, 5, 1, 10, 0, 0).unwrap(),
        };

        let dto = SavingMapper::to_dto(&saving);
        assert_eq!(dto.saving_type, SavingType::Contribution);
        assert_eq!(dto.date, "2025-05-01T10:00:00+00:00");
        assert_eq!(dto.title, "Phone");
    }
}
