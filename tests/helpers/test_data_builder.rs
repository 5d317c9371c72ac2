// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use stowage_analysis::domain::grid::{Stack, SubbayId};
use stowage_analysis::domain::vessel::{PortCall, StackReference, SubbayCapacity, VesselReference};
use stowage_analysis::domain::ContainerRecord;
use stowage_analysis::{ContainerSize, MacroTier};

// ==========================================
// ContainerRecord 构建器
// ==========================================

pub struct ContainerRecordBuilder {
    container_id: String,
    load_port: String,
    discharge_port: String,
    size: ContainerSize,
    type_code: String,
    height: String,
    weight_t: f64,
    setting: Option<String>,
    empty: bool,
    slot: Option<String>,
    dg_class: Option<String>,
    oog_left: bool,
    oog_right: bool,
}

impl ContainerRecordBuilder {
    pub fn new(container_id: &str, load_port: &str, discharge_port: &str) -> Self {
        Self {
            container_id: container_id.to_string(),
            load_port: load_port.to_string(),
            discharge_port: discharge_port.to_string(),
            size: ContainerSize::Forty,
            type_code: "GP".to_string(),
            height: String::new(),
            weight_t: 20.0,
            setting: None,
            empty: false,
            slot: None,
            dg_class: None,
            oog_left: false,
            oog_right: false,
        }
    }

    pub fn size(mut self, size: ContainerSize) -> Self {
        self.size = size;
        self
    }

    pub fn type_code(mut self, type_code: &str) -> Self {
        self.type_code = type_code.to_string();
        self
    }

    pub fn high_cube(mut self) -> Self {
        self.height = "HC".to_string();
        self
    }

    pub fn weight(mut self, weight_t: f64) -> Self {
        self.weight_t = weight_t;
        self
    }

    pub fn setting(mut self, setting: &str) -> Self {
        self.setting = Some(setting.to_string());
        self
    }

    pub fn empty(mut self) -> Self {
        self.empty = true;
        self
    }

    pub fn slot(mut self, slot: &str) -> Self {
        self.slot = Some(slot.to_string());
        self
    }

    pub fn dg(mut self, class: &str) -> Self {
        self.dg_class = Some(class.to_string());
        self
    }

    pub fn oog_left(mut self) -> Self {
        self.oog_left = true;
        self
    }

    pub fn oog_right(mut self) -> Self {
        self.oog_right = true;
        self
    }

    pub fn build(self) -> ContainerRecord {
        ContainerRecord {
            container_id: self.container_id,
            load_port: self.load_port,
            discharge_port: self.discharge_port,
            size: self.size,
            type_code: self.type_code,
            height: self.height,
            weight_t: self.weight_t,
            setting: self.setting,
            empty: self.empty,
            slot: self.slot,
            dg_class: self.dg_class,
            oog_left: self.oog_left,
            oog_right: self.oog_right,
        }
    }
}

// ==========================================
// 船舶与轮转
// ==========================================

/// 测试轮转港口 (序号 0..6)
pub const PORTS: [&str; 6] = [
    "SHANGHAI",
    "NINGBO",
    "SINGAPORE",
    "ROTTERDAM",
    "HAMBURG",
    "ANTWERP",
];

/// 创建测试港口轮转: ROTTERDAM 3 台岸桥、单桥效率 30
pub fn create_test_port_calls() -> Vec<PortCall> {
    PORTS
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let rotterdam = *name == "ROTTERDAM";
            PortCall {
                sequence: i as u16,
                port_name: name.to_string(),
                nb_cranes: if rotterdam { 3 } else { 2 },
                crane_single_speed: if rotterdam { Some(30.0) } else { None },
            }
        })
        .collect()
}

/// 创建测试船舶
///
/// - 舱盖分区 181: 1810 舱内 (18/1, 18/2), 1811 甲板 (18/1, 18/2)
/// - 舱盖分区 221: 2210 舱内 (22/1), 2211 甲板 (22/1)
pub fn create_test_vessel() -> VesselReference {
    let hold = |bay: u16, row: u8, subbay: &str| StackReference {
        stack: Stack::new(bay, row, MacroTier::Hold),
        subbay: SubbayId::from(subbay),
        first_tier: 2,
        max_slots: 5,
        max_weight: 150.0,
        nb_reefer_slots: 0,
    };
    let deck = |bay: u16, row: u8, subbay: &str| StackReference {
        stack: Stack::new(bay, row, MacroTier::Deck),
        subbay: SubbayId::from(subbay),
        first_tier: 82,
        max_slots: 4,
        max_weight: 90.0,
        nb_reefer_slots: 2,
    };

    VesselReference {
        stacks: vec![
            hold(18, 1, "1810"),
            hold(18, 2, "1810"),
            deck(18, 1, "1811"),
            deck(18, 2, "1811"),
            hold(22, 1, "2210"),
            deck(22, 1, "2211"),
        ],
        subbay_capacities: vec![SubbayCapacity {
            subbay: SubbayId::from("1810"),
            cap_20_or_40: 10,
            cap_only_20: 0,
            cap_only_40: 0,
        }],
    }
}
