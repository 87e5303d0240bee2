//! Field layout of every controller record type. Order and types define the
//! binary layout of the transport string.

use crate::client::plc_types::PlcTypes::{self, *};
use crate::client::plc_types::PlcVariable;

const fn v(name: &'static str, plc_type: PlcTypes) -> PlcVariable {
    PlcVariable::new(name, plc_type)
}

pub static TEMP_ZONE: &[PlcVariable] = &[
    v("Group", USInt),
    v("Name", USInt),
    v("SubNum", UInt),
    v("Unit", USInt),
    v("Dec", USInt),
    v("Enabled", Bool),
    PlcVariable::simple("RecipeSP1", Real),
    PlcVariable::simple("RecipeSP2", Real),
    v("HeatingEnabled", Bool),
    v("CoolingEnabled", Bool),
    v("OperatingMode", USInt),
    v("HeatCurrentController", USInt),
    v("MaxCoolingPower", Real),
    v("LBOn", Bool),
    v("LBTime", UDInt),
    v("CurrSP", Real),
    v("MinSP", Real),
    v("MaxSP", Real),
    v("Limit_Hysterese", Real),
    v("Limit_LA", Real),
    v("Limit_DL", Real),
    v("Limit_DH", Real),
    v("Limit_HA", Real),
    v("dynGeneral", Real),
    v("XPH", Real),
    v("XPC", Real),
    v("TNH", Real),
    v("TNC", Real),
    v("TVH", Real),
    v("TVC", Real),
    v("TABH", Real),
    v("TABC", Real),
    v("StartLockTemp", Real),
    v("GentleStartup", Bool),
];

pub static TEMP_GROUP: &[PlcVariable] = &[
    v("HeatThroughTime", UDInt),
    v("TimerOnTime[0]", Tod),
    v("TimerOnTime[1]", Tod),
    v("TimerOnTime[2]", Tod),
    v("TimerOnTime[3]", Tod),
    v("TimerOnTime[4]", Tod),
    v("TimerOnTime[5]", Tod),
    v("TimerOnTime[6]", Tod),
];

pub static ACT: &[PlcVariable] = &[
    v("Group", USInt),
    v("Name", USInt),
    v("SubNum", UInt),
    v("Unit", USInt),
    v("Dec", USInt),
    v("LineLoweringValue", Real),
    v("EnableAbsoluteAlarms", Bool),
    v("EnableDeviationAlarms", Bool),
    v("Limit_Hysterese", Real),
    v("Limit_LLA", Real),
    v("Limit_LA", Real),
    v("Limit_DL", Real),
    v("Limit_DH", Real),
    v("Limit_HA", Real),
    v("Limit_HHA", Real),
    v("Filter_Factor", Real),
    v("ScalCustom", Bool),
    v("ScalExtern1", Real),
    v("ScalPLC1", Real),
    v("ScalExtern2", Real),
    v("ScalPLC2", Real),
    v("ZeroCatch", Real),
    v("SBreakValue", Real),
    v("CounterResetMode", USInt),
];

pub static SET: &[PlcVariable] = &[
    v("Group", USInt),
    v("Name", USInt),
    v("SubNum", UInt),
    v("Unit", USInt),
    v("Dec", USInt),
    v("RampUpTime", UInt),
    v("LineLowerPrc", USInt),
    v("SynchronMode", USInt),
    v("KeepSetValueWhenOff", Bool),
    v("RampingPossible", Bool),
    v("ScalCustom", Bool),
    v("RangeEnabled", Bool),
    v("RangeMaxValue", Real),
    v("RangeMinValue", Real),
    v("Ramp[0].Delay", UDInt),
    v("Ramp[0].Setpoint", Real),
    v("Ramp[0].StartupTime", UDInt),
    v("Ramp[1].Delay", UDInt),
    v("Ramp[1].Setpoint", Real),
    v("Ramp[1].StartupTime", UDInt),
    v("Ramp[2].Delay", UDInt),
    v("Ramp[2].Setpoint", Real),
    v("Ramp[2].StartupTime", UDInt),
    v("ResetValue", Real),
    v("ResetTime", UDInt),
    v("Step", Real),
    v("ScalExtern1", Real),
    v("ScalPLC1", Real),
    v("ScalExtern2", Real),
    v("ScalPLC2", Real),
    PlcVariable::simple("RecipeValue", Real),
];

pub static STATE: &[PlcVariable] = &[
    v("Group", USInt),
    v("Name", USInt),
    v("SubNum", UInt),
    v("AlarmMode", USInt),
    v("Delay", Int),
    v("EnableHMIInverse", Bool),
    v("Invers", Bool),
];

pub static SAW_CONTROL: &[PlcVariable] = &[
    v("Profiling.NumberOfNeededProfiles[0]", UInt),
    v("Profiling.NumberOfNeededProfiles[1]", UInt),
    v("Profiling.NumberOfNeededProfiles[2]", UInt),
    v("Profiling.NumberOfNeededProfiles[3]", UInt),
    v("Profiling.NumberOfNeededProfiles[4]", UInt),
    v("Profiling.NumberOfNeededProfiles[5]", UInt),
    v("Profiling.ProfilLength[0]", UDInt),
    v("Profiling.ProfilLength[1]", UDInt),
    v("Profiling.ProfilLength[2]", UDInt),
    v("Profiling.ProfilLength[3]", UDInt),
    v("Profiling.ProfilLength[4]", UDInt),
    v("Profiling.ProfilLength[5]", UDInt),
    v("Profiling.ProfilOffset[0]", DInt),
    v("Profiling.ProfilOffset[1]", DInt),
    v("Profiling.ProfilOffset[2]", DInt),
    v("Profiling.ProfilOffset[3]", DInt),
    v("Profiling.ProfilOffset[4]", DInt),
    v("Profiling.ProfilOffset[5]", DInt),
    v("TippingThrough.PulseDuration", Real),
    v("TippingThrough.MoveDistance", DInt),
    v("Thickening.Active", Bool),
    v("Thickening.Position", USInt),
    v("Thickening.Distance", UDInt),
    v("Thickening.Length", UDInt),
    v("Thickening.Percent", Real),
    v("Thickening.Offset", DInt),
    v("SampleLength", UDInt),
    v("ScalingFactor", DInt),
    v("CuttingPulse", Real),
];

pub static MELT_PUMP_CONTROL: &[PlcVariable] = &[
    v("Enabled", Bool),
    v("XP", Real),
    v("TN", Real),
    v("TAB", UDInt),
    v("MinRpmPump", Real),
    v("TimeShutdown", UDInt),
    v("TimeProduction", UDInt),
    v("TimeStartup", UDInt),
    v("MaxPressureDiff", Real),
    v("MinPressureDiff", Real),
    v("MinMPIn", Real),
];

pub static METERWEIGHT: &[PlcVariable] = &[
    v("SP", Real),
    v("XP", Real),
    v("TN", Real),
    v("TAB", Real),
    v("Limit", UInt),
];

pub static CAN_MASTER: &[PlcVariable] = &[
    v("NodeId", USInt),
    v("HeartBeatTime", UInt),
    v("SyncIntervall", UInt),
];

pub static CAN_SLAVE: &[PlcVariable] = &[
    v("Enabled", Bool),
    v("AutomaticNodeSearch", Bool),
    v("NodeId", USInt),
    v("MasterHeartBeatTimeOutTime", UInt),
    v("SlaveHeartBeatTimeOutTime", UInt),
    v("TxPDOTimeOutTime", UInt),
    v("ProducerHeartBeatTime", UInt),
    v("SDOCycleTime", UInt),
    v("SDOPause", UInt),
];

pub static EM27_PULLER: &[PlcVariable] = &[
    v("SpeedSetMaximum", UDInt),
    v("ScalingFactor", UDInt),
    v("LoadSetValue", UDInt),
    v("HeightAdj[0]", Int),
    v("HeightAdj[1]", Int),
    v("HeightAdj[2]", Int),
    v("HeightAdj[3]", Int),
    v("HeightAdj[4]", Int),
    v("HeightAdj[5]", Int),
    v("HeightAdj[6]", Int),
    v("HeightAdj[7]", Int),
    v("HeightAdj[8]", Int),
    v("HeightAdj[9]", Int),
    v("PressureSetValue[0]", UInt),
    v("PressureSetValue[1]", UInt),
    v("PressureSetValue[2]", UInt),
    v("PressureSetValue[3]", UInt),
    v("PressureSetValue[4]", UInt),
    v("PressureSetValue[5]", UInt),
    v("PressureSetValue[6]", UInt),
    v("PressureSetValue[7]", UInt),
    v("PressureSetValue[8]", UInt),
    v("PressureSetValue[9]", UInt),
    v("AutoSpeedMax", Bool),
];

pub static EM27_SAW: &[PlcVariable] = &[
    v("ScalingFactor", UDInt),
    v("EarlyWarningLength", UDInt),
    v("ProductGrooveSetValue", UDInt),
    v("CutDepth", UInt),
    v("HeightAdj[0]", Int),
    v("HeightAdj[1]", Int),
    v("HeightAdj[2]", Int),
    v("HeightAdj[3]", Int),
    v("HeightAdj[4]", Int),
    v("HeightAdj[5]", Int),
    v("HeightAdj[6]", Int),
    v("HeightAdj[7]", Int),
    v("HeightAdj[8]", Int),
    v("HeightAdj[9]", Int),
];

pub static EM27_CORRUGATOR: &[PlcVariable] = &[
    v("SpeedSetMaximum", UDInt),
    v("ScalingFactor", UDInt),
    v("SpeedStep", UInt),
    v("HeightAdj[0]", Int),
    v("HeightAdj[1]", Int),
    v("HeightAdj[2]", Int),
    v("HeightAdj[3]", Int),
    v("HeightAdj[4]", Int),
    v("HeightAdj[5]", Int),
    v("HeightAdj[6]", Int),
    v("HeightAdj[7]", Int),
    v("HeightAdj[8]", Int),
    v("HeightAdj[9]", Int),
    v("PressureSetValue[0]", UInt),
    v("PressureSetValue[1]", UInt),
    v("PressureSetValue[2]", UInt),
    v("PressureSetValue[3]", UInt),
    v("PressureSetValue[4]", UInt),
    v("PressureSetValue[5]", UInt),
    v("PressureSetValue[6]", UInt),
    v("PressureSetValue[7]", UInt),
    v("PressureSetValue[8]", UInt),
    v("PressureSetValue[9]", UInt),
    v("AutoSpeedMax", Bool),
];

pub static IGS: &[PlcVariable] = &[
    v("CalibrationFactor", Real),
    v("StartThreshold", Real),
    v("MaxRPM", Real),
    v("DefaultFeedrate", Real),
    v("CalmingTime", UDInt),
    v("ImpulsesPerTurn", UInt),
    v("EmptyWeight", UInt),
    v("SMIndex", UInt),
];

pub static GENERAL: &[PlcVariable] = &[
    v("LoopsCurrMax", Real),
    v("LockDosingRPM", Real),
    v("FreeRpm", Real),
    v("OffAfterTune", Bool),
    v("UserRFID", Bool),
    v("Nexxt365Used", Bool),
    v("InputLog", Bool),
    v("TempOffEmgcy", Bool),
    v("Maintenance", Bool),
    v("MirrorInverted", Bool),
    v("TempF", Bool),
];
