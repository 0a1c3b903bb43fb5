//! Calculator session state, driven through [`Command`]s.

use crate::config::CalculatorConfig;
use crate::error::{CalculatorError, Result};
use crate::pricing::PricingReport;
use crate::schema::{CalculatorSnapshot, DailyRecord, ExpenseItem, ExpenseList};
use log::debug;

pub const NEW_ITEM_LABEL: &str = "Nova Despesa";

const DEFAULT_FIXED_EXPENSES: [&str; 25] = [
    "PRO LABORE SALÁRIO",
    "PAGT HELPER",
    "SALES TAX",
    "TAXA DO CARTÃO DE CREDITO",
    "APLICATIVOS VENNO",
    "RESERVA FINANCEIRA",
    "TROCA CHEQUE - CASH",
    "CRM",
    "MARKETING",
    "TELEFONE/INTERNET",
    "ENERGIA/ÁGUA",
    "MATERIAL DE LIMPEZA",
    "LAVANDERIA",
    "LIABILITY INSURANCE",
    "ALUGUEL DA SALA",
    "CONTABILIDADE",
    "DESPESAS BANCÁRIAS",
    "UNIFORME",
    "EQUIPAMENTOS",
    "MANUTENÇÃO DE EQUIPAMENTOS",
    "MANUTENÇÃO DO VEICULO",
    "PRESTAÇÃO DO VEICULO",
    "SEGURO VEICULO",
    "PEDÁGIO",
    "OUTRAS",
];

const DEFAULT_CONTINGENCY_COSTS: [&str; 4] = [
    "REPOSIÇÃO DE ESTOQUE(DESCARTÁVEIS)",
    "MATERIAL ESCRITÓRIO",
    "GASTOS COM HELPER",
    "ABERTURA DE CONTA EM BANCO",
];

pub fn default_fixed_expenses() -> Vec<ExpenseItem> {
    numbered_items("fe", &DEFAULT_FIXED_EXPENSES)
}

pub fn default_contingency_costs() -> Vec<ExpenseItem> {
    numbered_items("cc", &DEFAULT_CONTINGENCY_COSTS)
}

fn numbered_items(prefix: &str, labels: &[&str]) -> Vec<ExpenseItem> {
    labels
        .iter()
        .enumerate()
        .map(|(i, label)| ExpenseItem::new(format!("{}{}", prefix, i + 1), *label, 0.0))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CalculatorMode {
    #[default]
    New,
    Edit(String),
    View(String),
}

impl CalculatorMode {
    pub fn is_read_only(&self) -> bool {
        matches!(self, Self::View(_))
    }

    pub fn record_id(&self) -> Option<&str> {
        match self {
            Self::New => None,
            Self::Edit(id) | Self::View(id) => Some(id),
        }
    }
}

/// How a loaded record should be opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    Edit,
    View,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SetItemLabel {
        list: ExpenseList,
        id: String,
        label: String,
    },
    SetItemValue {
        list: ExpenseList,
        id: String,
        value: f64,
    },
    AddItem(ExpenseList),
    DeleteItem {
        list: ExpenseList,
        id: String,
    },
    SetProfitMargin(f64),
    SetReservePercentage(f64),
    SetClientReceipts(f64),
    LoadRecord {
        record: DailyRecord,
        mode: OpenMode,
    },
    Reset,
}

#[derive(Debug, Clone, PartialEq)]
/// Fields are only changed through [`CalculatorState::apply`], which is
/// where `View` mode is enforced.
pub struct CalculatorState {
    fixed_expenses: Vec<ExpenseItem>,
    contingency_costs: Vec<ExpenseItem>,
    profit_margin: f64,
    financial_reserve_percentage: f64,
    client_receipts: f64,
    mode: CalculatorMode,
    default_profit_margin: f64,
    default_reserve_percentage: f64,
    next_item_seq: u64,
}

impl Default for CalculatorState {
    fn default() -> Self {
        Self::new(&CalculatorConfig::default())
    }
}

impl CalculatorState {
    pub fn new(config: &CalculatorConfig) -> Self {
        Self {
            fixed_expenses: default_fixed_expenses(),
            contingency_costs: default_contingency_costs(),
            profit_margin: config.default_profit_margin,
            financial_reserve_percentage: config.default_reserve_percentage,
            client_receipts: 0.0,
            mode: CalculatorMode::New,
            default_profit_margin: config.default_profit_margin,
            default_reserve_percentage: config.default_reserve_percentage,
            next_item_seq: 1,
        }
    }

    pub fn apply(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Reset => self.reset(),
            Command::LoadRecord { record, mode } => self.load_record(record, mode),
            Command::SetItemLabel { list, id, label } => {
                self.ensure_editable()?;
                self.item_mut(list, &id)?.label = label;
            }
            Command::SetItemValue { list, id, value } => {
                self.ensure_editable()?;
                self.item_mut(list, &id)?.value = value;
            }
            Command::AddItem(list) => {
                self.ensure_editable()?;
                let id = self.next_item_id(list);
                debug!("Adding expense line {} to {}", id, list);
                self.items_mut(list)
                    .push(ExpenseItem::new(id, NEW_ITEM_LABEL, 0.0));
            }
            Command::DeleteItem { list, id } => {
                self.ensure_editable()?;
                let items = self.items_mut(list);
                let before = items.len();
                items.retain(|item| item.id != id);
                if items.len() == before {
                    return Err(CalculatorError::ItemNotFound {
                        list: list.to_string(),
                        id,
                    });
                }
            }
            Command::SetProfitMargin(value) => {
                self.ensure_editable()?;
                self.profit_margin = value;
            }
            Command::SetReservePercentage(value) => {
                self.ensure_editable()?;
                self.financial_reserve_percentage = value;
            }
            Command::SetClientReceipts(value) => {
                self.ensure_editable()?;
                self.client_receipts = value;
            }
        }
        Ok(())
    }

    fn ensure_editable(&self) -> Result<()> {
        match &self.mode {
            CalculatorMode::View(id) => Err(CalculatorError::ReadOnly(id.clone())),
            _ => Ok(()),
        }
    }

    pub fn reset(&mut self) {
        self.fixed_expenses = default_fixed_expenses();
        self.contingency_costs = default_contingency_costs();
        self.profit_margin = self.default_profit_margin;
        self.financial_reserve_percentage = self.default_reserve_percentage;
        self.client_receipts = 0.0;
        self.mode = CalculatorMode::New;
    }

    fn load_record(&mut self, record: DailyRecord, mode: OpenMode) {
        let snapshot = record.snapshot;
        self.fixed_expenses = snapshot.fixed_expenses;
        self.contingency_costs = snapshot.contingency_costs;
        self.profit_margin = snapshot.profit_margin;
        self.financial_reserve_percentage = snapshot.financial_reserve_percentage;
        self.client_receipts = snapshot.client_receipts;
        self.mode = match mode {
            OpenMode::Edit => CalculatorMode::Edit(record.id),
            OpenMode::View => CalculatorMode::View(record.id),
        };
    }

    pub fn fixed_expenses(&self) -> &[ExpenseItem] {
        &self.fixed_expenses
    }

    pub fn contingency_costs(&self) -> &[ExpenseItem] {
        &self.contingency_costs
    }

    pub fn profit_margin(&self) -> f64 {
        self.profit_margin
    }

    pub fn financial_reserve_percentage(&self) -> f64 {
        self.financial_reserve_percentage
    }

    pub fn client_receipts(&self) -> f64 {
        self.client_receipts
    }

    pub fn mode(&self) -> &CalculatorMode {
        &self.mode
    }

    pub fn items(&self, list: ExpenseList) -> &[ExpenseItem] {
        match list {
            ExpenseList::Fixed => &self.fixed_expenses,
            ExpenseList::Contingency => &self.contingency_costs,
        }
    }

    fn items_mut(&mut self, list: ExpenseList) -> &mut Vec<ExpenseItem> {
        match list {
            ExpenseList::Fixed => &mut self.fixed_expenses,
            ExpenseList::Contingency => &mut self.contingency_costs,
        }
    }

    fn item_mut(&mut self, list: ExpenseList, id: &str) -> Result<&mut ExpenseItem> {
        self.items_mut(list)
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| CalculatorError::ItemNotFound {
                list: list.to_string(),
                id: id.to_string(),
            })
    }

    fn next_item_id(&mut self, list: ExpenseList) -> String {
        loop {
            let candidate = format!("new-{}", self.next_item_seq);
            self.next_item_seq += 1;
            if !self.items(list).iter().any(|item| item.id == candidate) {
                return candidate;
            }
        }
    }

    pub fn snapshot(&self) -> CalculatorSnapshot {
        CalculatorSnapshot {
            fixed_expenses: self.fixed_expenses.clone(),
            contingency_costs: self.contingency_costs.clone(),
            profit_margin: self.profit_margin,
            financial_reserve_percentage: self.financial_reserve_percentage,
            client_receipts: self.client_receipts,
        }
    }

    pub fn report(&self) -> PricingReport {
        PricingReport::from_snapshot(&self.snapshot())
    }
}
