/// A logical input column and the header spellings accepted for it.
pub trait ColumnSpec: Copy + Eq + std::hash::Hash + std::fmt::Debug {
    fn as_str(&self) -> &'static str;
    fn aliases(&self) -> Vec<&'static str>;
    fn is_required(&self) -> bool;
}

/// Columns of an equity-curve export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EquityColumn {
    Timestamp,
    Equity,
    DrawdownPct,
}

impl EquityColumn {
    pub fn all() -> Vec<Self> {
        vec![Self::Timestamp, Self::Equity, Self::DrawdownPct]
    }
}

impl ColumnSpec for EquityColumn {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Timestamp => "timestamp",
            Self::Equity => "equity",
            Self::DrawdownPct => "drawdown_pct",
        }
    }

    fn aliases(&self) -> Vec<&'static str> {
        match self {
            Self::Timestamp => vec!["timestamp", "Timestamp", "time", "Time", "datetime", "date", "Date"],
            Self::Equity => vec!["equity", "Equity", "EQUITY", "balance", "Balance", "value", "nav"],
            Self::DrawdownPct => vec!["drawdown_pct", "drawdownPct", "drawdown", "Drawdown", "dd_pct", "dd"],
        }
    }

    fn is_required(&self) -> bool {
        !matches!(self, Self::DrawdownPct)
    }
}

/// Columns of a trade-list export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TradeColumn {
    EntryTime,
    ExitTime,
    Side,
    Pnl,
    Mfe,
    Mae,
    MfePct,
    MaePct,
}

impl TradeColumn {
    pub fn all() -> Vec<Self> {
        vec![
            Self::EntryTime,
            Self::ExitTime,
            Self::Side,
            Self::Pnl,
            Self::Mfe,
            Self::Mae,
            Self::MfePct,
            Self::MaePct,
        ]
    }
}

impl ColumnSpec for TradeColumn {
    fn as_str(&self) -> &'static str {
        match self {
            Self::EntryTime => "entry_time",
            Self::ExitTime => "exit_time",
            Self::Side => "side",
            Self::Pnl => "pnl",
            Self::Mfe => "mfe",
            Self::Mae => "mae",
            Self::MfePct => "mfe_pct",
            Self::MaePct => "mae_pct",
        }
    }

    fn aliases(&self) -> Vec<&'static str> {
        match self {
            Self::EntryTime => vec!["entry_time", "entryTime", "entry", "open_time"],
            Self::ExitTime => vec!["exit_time", "exitTime", "exit", "close_time"],
            Self::Side => vec!["side", "Side", "direction", "type"],
            Self::Pnl => vec!["pnl", "PnL", "profit", "net_pnl"],
            Self::Mfe => vec!["mfe", "MFE", "runup"],
            Self::Mae => vec!["mae", "MAE", "drawdown"],
            Self::MfePct => vec!["mfe_pct", "mfePct", "runup_pct"],
            Self::MaePct => vec!["mae_pct", "maePct", "drawdown_pct"],
        }
    }

    fn is_required(&self) -> bool {
        matches!(self, Self::EntryTime | Self::ExitTime | Self::Side | Self::Pnl)
    }
}
