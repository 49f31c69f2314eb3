pub mod enums;
pub mod error;
pub mod filter;
pub mod records;

// Re-export the core types to provide a clean public API.
pub use enums::{
    AnimalStatus, AttendanceStatus, BreedingEventType, BreedingMethod, BreedingOutcome,
    CropStatus, Direction, EquipmentStatus, HealthRecordType, LifecycleStage, MilkSession,
    MilkUsage, Sex, WorkerStatus,
};
pub use error::CoreError;
pub use filter::{DateRange, RecordFilter};
pub use records::{
    Animal, Attendance, BreedingRecord, Equipment, EquipmentMaintenance, FeedConsumption,
    FeedInventory, FinancialTransaction, FodderCultivation, HealthRecord, MedicineItem,
    MilkRecord, NewAnimal, NewAttendance, NewBreedingRecord, NewEquipment,
    NewEquipmentMaintenance, NewFeedConsumption, NewFeedInventory, NewFinancialTransaction,
    NewFodderCultivation, NewHealthRecord, NewMedicineItem, NewMilkRecord, NewWorker, Worker,
};
