//! The DAO runtime: one sequenced ledger hosting the token, the timelock, the
//! governor and deployed contracts.

use crate::config::DaoConfig;
use crate::error::DaoError;
use zar_governance::{Governor, Proposal, ProposalState, Tally, VoteType};
use zar_ledger::{ContractRegistry, Sequencer};
use zar_timelock::{Role, Timelock};
use zar_treasury::Treasury;
use zar_types::{Action, Address, LedgerPoint, OperationId, Position, ProposalId};
use zar_utils::format_blocks;
use zar_votes::{TokenMetadata, VoteWeightLedger};

/// A running DAO.
///
/// Every public `&mut self` method is one ledger transaction: it is stamped
/// with a fresh [`LedgerPoint`], and with `automine` enabled the ledger moves
/// one position forward afterwards whether or not the transaction succeeded.
pub struct Dao {
    config: DaoConfig,
    sequencer: Sequencer,
    token: VoteWeightLedger,
    timelock: Timelock,
    governor: Governor,
    registry: ContractRegistry,
}

impl Dao {
    /// Mint the initial supply to `admin` and set up the timelock and governor
    /// at addresses derived from `admin`.
    ///
    /// The governor holds the timelock's proposer and executor roles. `admin`
    /// is the timelock's bootstrap admin until it calls
    /// [`Dao::renounce_timelock_admin`].
    pub fn bootstrap(config: DaoConfig, admin: &Address) -> Result<Self, DaoError> {
        config.validate()?;
        let mut sequencer = Sequencer::new(Position::new(config.ledger.genesis_position));
        let mut registry = ContractRegistry::new();

        let mut token = VoteWeightLedger::new(TokenMetadata {
            name: config.token.name.clone(),
            symbol: config.token.symbol.clone(),
            decimals: config.token.decimals,
        });
        token.mint(
            admin,
            u128::from(config.token.initial_supply),
            sequencer.next_point(),
        )?;

        let timelock_address = registry.reserve_address(admin);
        let governor_address = registry.reserve_address(admin);
        let governor = Governor::new(
            config.governor.name.clone(),
            governor_address.clone(),
            config.governor.settings(),
        )?;
        let timelock = Timelock::new(
            timelock_address,
            config.timelock.min_delay,
            std::slice::from_ref(&governor_address),
            std::slice::from_ref(&governor_address),
            Some(admin),
        );

        tracing::info!(
            dao = %governor.name(),
            %admin,
            governor = %governor.address(),
            timelock = %timelock.address(),
            supply = config.token.initial_supply,
            "dao bootstrapped"
        );

        if config.ledger.automine {
            sequencer.mine(1);
        }
        Ok(Self {
            config,
            sequencer,
            token,
            timelock,
            governor,
            registry,
        })
    }

    // ── Accessors ───────────────────────────────────────────────────────

    pub fn config(&self) -> &DaoConfig {
        &self.config
    }

    pub fn token(&self) -> &VoteWeightLedger {
        &self.token
    }

    pub fn timelock(&self) -> &Timelock {
        &self.timelock
    }

    pub fn governor(&self) -> &Governor {
        &self.governor
    }

    pub fn registry(&self) -> &ContractRegistry {
        &self.registry
    }

    // ── Ledger ──────────────────────────────────────────────────────────

    pub fn position(&self) -> Position {
        self.sequencer.position()
    }

    /// Advance the ledger by `blocks` positions.
    pub fn mine(&mut self, blocks: u64) {
        self.sequencer.mine(blocks);
    }

    /// Advance the ledger to `target`.
    pub fn mine_to(&mut self, target: Position) -> Result<(), DaoError> {
        Ok(self.sequencer.advance_to(target)?)
    }

    /// Allocate native currency to `account` outside any transaction, as a
    /// genesis allocation would.
    pub fn fund_native(&mut self, account: &Address, amount: u128) -> Result<(), DaoError> {
        Ok(self.registry.balances_mut().credit(account, amount)?)
    }

    // ── Token ───────────────────────────────────────────────────────────

    pub fn transfer(&mut self, from: &Address, to: &Address, amount: u128) -> Result<(), DaoError> {
        self.transact(|dao, now| Ok(dao.token.transfer(from, to, amount, now)?))
    }

    pub fn delegate(&mut self, account: &Address, delegatee: &Address) -> Result<(), DaoError> {
        self.transact(|dao, now| Ok(dao.token.delegate(account, delegatee, now)?))
    }

    // ── Contracts ───────────────────────────────────────────────────────

    /// Deploy a treasury owned by `deployer` that pays out to `payee`,
    /// funded with `funding` native units from the deployer.
    pub fn deploy_treasury(
        &mut self,
        deployer: &Address,
        payee: &Address,
        funding: u128,
    ) -> Result<Address, DaoError> {
        self.transact(|dao, _now| {
            let treasury = Treasury::new(deployer.clone(), payee.clone());
            let address = dao.registry.deploy(deployer, Box::new(treasury), funding)?;
            tracing::info!(%address, %deployer, %payee, funding, "treasury deployed");
            Ok(address)
        })
    }

    /// Call a contract (or send native value) directly as `caller`.
    pub fn call(&mut self, caller: &Address, action: Action) -> Result<(), DaoError> {
        self.transact(|dao, now| Ok(dao.registry.call(caller, &action, now)?))
    }

    // ── Governance ──────────────────────────────────────────────────────

    pub fn propose(
        &mut self,
        proposer: &Address,
        actions: Vec<Action>,
        description: &str,
    ) -> Result<ProposalId, DaoError> {
        self.transact(|dao, now| {
            Ok(dao
                .governor
                .propose(proposer, actions, description, &dao.token, now)?)
        })
    }

    pub fn cast_vote(
        &mut self,
        voter: &Address,
        id: &ProposalId,
        support: VoteType,
    ) -> Result<u128, DaoError> {
        self.cast_vote_with_reason(voter, id, support, None)
    }

    pub fn cast_vote_with_reason(
        &mut self,
        voter: &Address,
        id: &ProposalId,
        support: VoteType,
        reason: Option<String>,
    ) -> Result<u128, DaoError> {
        self.transact(|dao, now| {
            Ok(dao.governor.cast_vote_with_reason(
                voter,
                id,
                support,
                reason,
                &dao.token,
                &dao.timelock,
                now,
            )?)
        })
    }

    pub fn queue(&mut self, id: &ProposalId) -> Result<OperationId, DaoError> {
        self.transact(|dao, now| {
            let operation = dao.governor.queue(id, &dao.token, &mut dao.timelock, now)?;
            let wait = format_blocks(dao.timelock.min_delay(), dao.config.ledger.block_time_secs);
            tracing::debug!(proposal = %id, %operation, %wait, "waiting for timelock");
            Ok(operation)
        })
    }

    pub fn execute(&mut self, id: &ProposalId) -> Result<OperationId, DaoError> {
        self.transact(|dao, now| {
            Ok(dao.governor.execute(
                id,
                &dao.token,
                &mut dao.timelock,
                &mut dao.registry,
                now,
            )?)
        })
    }

    pub fn cancel(&mut self, caller: &Address, id: &ProposalId) -> Result<(), DaoError> {
        self.transact(|dao, now| Ok(dao.governor.cancel(caller, id, &dao.token, &dao.timelock, now)?))
    }

    /// Timelock admin override: drop a scheduled operation.
    pub fn cancel_operation(&mut self, caller: &Address, id: &OperationId) -> Result<(), DaoError> {
        self.transact(|dao, _now| {
            dao.timelock.cancel(caller, id)?;
            Ok(())
        })
    }

    /// The bootstrap admin gives up its timelock admin role. Roles then only
    /// change through passed proposals carrying `TimelockCall` actions.
    pub fn renounce_timelock_admin(&mut self, caller: &Address) -> Result<(), DaoError> {
        self.transact(|dao, _now| {
            dao.timelock.renounce_role(caller, Role::Admin);
            Ok(())
        })
    }

    // ── Views ───────────────────────────────────────────────────────────

    pub fn state(&self, id: &ProposalId) -> Result<ProposalState, DaoError> {
        Ok(self
            .governor
            .state(id, &self.token, &self.timelock, self.sequencer.peek())?)
    }

    pub fn proposal(&self, id: &ProposalId) -> Result<&Proposal, DaoError> {
        Ok(self.governor.proposal(id)?)
    }

    pub fn proposal_votes(&self, id: &ProposalId) -> Result<Tally, DaoError> {
        Ok(self.governor.proposal_votes(id)?)
    }

    pub fn quorum(&self, at: Position) -> Result<u128, DaoError> {
        Ok(self.governor.quorum(&self.token, at, self.sequencer.peek())?)
    }

    pub fn balance_of(&self, account: &Address) -> u128 {
        self.token.balance_of(account)
    }

    pub fn get_votes(&self, account: &Address) -> u128 {
        self.token.get_votes(account)
    }

    pub fn get_past_votes(&self, account: &Address, at: Position) -> Result<u128, DaoError> {
        Ok(self.token.get_past_votes(account, at, self.sequencer.peek())?)
    }

    pub fn native_balance(&self, account: &Address) -> u128 {
        self.registry.balances().balance_of(account)
    }

    pub fn is_released(&self, treasury: &Address) -> Result<bool, DaoError> {
        Ok(self.registry.contract::<Treasury>(treasury)?.is_released())
    }

    pub fn treasury(&self, address: &Address) -> Result<&Treasury, DaoError> {
        Ok(self.registry.contract::<Treasury>(address)?)
    }

    fn transact<T>(
        &mut self,
        f: impl FnOnce(&mut Self, LedgerPoint) -> Result<T, DaoError>,
    ) -> Result<T, DaoError> {
        let now = self.sequencer.next_point();
        let result = f(self, now);
        if self.config.ledger.automine {
            self.sequencer.mine(1);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zar_governance::SnapshotPolicy;

    fn addr(name: &str) -> Address {
        Address::new(format!("zar_{name}"))
    }

    #[test]
    fn bootstrap_mints_and_wires_roles() {
        let admin = addr("admin");
        let dao = Dao::bootstrap(DaoConfig::default(), &admin).unwrap();
        assert_eq!(dao.balance_of(&admin), 1000);
        assert_eq!(dao.token().total_supply(), 1000);
        assert_eq!(dao.position(), Position::new(1));

        let gov = dao.governor().address().clone();
        assert!(dao.timelock().has_role(Role::Proposer, &gov));
        assert!(dao.timelock().has_role(Role::Executor, &gov));
        assert!(dao.timelock().has_role(Role::Admin, &admin));
        assert_ne!(&gov, dao.timelock().address());
    }

    #[test]
    fn failed_transaction_still_advances_with_automine() {
        let admin = addr("admin");
        let mut dao = Dao::bootstrap(DaoConfig::default(), &admin).unwrap();
        let before = dao.position();
        assert!(dao.transfer(&addr("nobody"), &admin, 1).is_err());
        assert_eq!(dao.position(), before.saturating_add(1));
    }

    #[test]
    fn manual_mining_keeps_position() {
        let admin = addr("admin");
        let mut config = DaoConfig::default();
        config.ledger.automine = false;
        config.ledger.genesis_position = 10;
        let mut dao = Dao::bootstrap(config, &admin).unwrap();
        dao.transfer(&admin, &addr("a"), 5).unwrap();
        dao.transfer(&admin, &addr("b"), 5).unwrap();
        assert_eq!(dao.position(), Position::new(10));
        dao.mine(3);
        assert_eq!(dao.position(), Position::new(13));
        assert!(dao.mine_to(Position::new(12)).is_err());
        dao.mine_to(Position::new(20)).unwrap();
        assert_eq!(dao.position(), Position::new(20));
    }

    #[test]
    fn invalid_config_rejected_at_bootstrap() {
        let mut config = DaoConfig::default();
        config.governor.snapshot_policy = SnapshotPolicy::AtCreation;
        config.governor.voting_delay = 0;
        assert!(Dao::bootstrap(config, &addr("admin")).is_err());
    }

    #[test]
    fn renounced_admin_cannot_cancel_operations() {
        let admin = addr("admin");
        let mut dao = Dao::bootstrap(DaoConfig::default(), &admin).unwrap();
        dao.renounce_timelock_admin(&admin).unwrap();
        assert!(!dao.timelock().has_role(Role::Admin, &admin));
        let err = dao
            .cancel_operation(&admin, &OperationId::new([1; 32]))
            .unwrap_err();
        assert!(matches!(err, DaoError::Timelock(_)));
    }
}
