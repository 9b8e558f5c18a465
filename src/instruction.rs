//! Instruction types

use {
    crate::state::OptionalNonZeroPubkey,
    borsh::{BorshDeserialize, BorshSerialize},
    solana_program::{
        instruction::{AccountMeta, Instruction},
        program_error::ProgramError,
        pubkey::Pubkey,
    },
    spl_discriminator::{ArrayDiscriminator, SplDiscriminate},
};

/// Fields in the metadata account
#[derive(Clone, Debug, PartialEq, BorshSerialize, BorshDeserialize)]
pub enum Field {
    /// The name field, corresponding to `TokenMetadata.name`
    Name,
    /// The symbol field, corresponding to `TokenMetadata.symbol`
    Symbol,
    /// The uri field, corresponding to `TokenMetadata.uri`
    Uri,
    /// A user field, whose key is given by the associated string
    Key(String),
}
impl Field {
    /// Maps a key string to one of the well-known fields on exact match,
    /// falling back to a user field carrying the key verbatim
    pub fn from_key(key: &str) -> Self {
        match key {
            "Name" => Self::Name,
            "Symbol" => Self::Symbol,
            "Uri" => Self::Uri,
            _ => Self::Key(key.to_string()),
        }
    }
}

/// Initialization instruction data
#[derive(Clone, Debug, PartialEq, BorshSerialize, BorshDeserialize, SplDiscriminate)]
#[discriminator_hash_input("spl_token_metadata_interface:initialize_account")]
pub struct Initialize {
    /// Longer name of the token
    pub name: String,
    /// Shortened symbol of the token
    pub symbol: String,
    /// URI pointing to more metadata (image, video, etc.)
    pub uri: String,
}

/// Update field instruction data
#[derive(Clone, Debug, PartialEq, BorshSerialize, BorshDeserialize, SplDiscriminate)]
#[discriminator_hash_input("spl_token_metadata_interface:updating_field")]
pub struct UpdateField {
    /// Field to update in the metadata
    pub field: Field,
    /// Value to write for the field
    pub value: String,
}

/// Remove key instruction data
#[derive(Clone, Debug, PartialEq, BorshSerialize, BorshDeserialize, SplDiscriminate)]
#[discriminator_hash_input("spl_token_metadata_interface:remove_key_ix")]
pub struct RemoveKey {
    /// If the idempotent flag is set to true, then the instruction will not
    /// error if the key does not exist
    pub idempotent: bool,
    /// Key to remove in the additional metadata portion
    pub key: String,
}

/// Update authority instruction data
#[derive(Clone, Debug, PartialEq, BorshSerialize, BorshDeserialize, SplDiscriminate)]
#[discriminator_hash_input("spl_token_metadata_interface:update_the_authority")]
pub struct UpdateAuthority {
    /// New authority for the token metadata, or unset if `None`
    pub new_authority: OptionalNonZeroPubkey,
}

/// Instruction data for Emit
#[derive(Clone, Debug, PartialEq, BorshSerialize, BorshDeserialize, SplDiscriminate)]
#[discriminator_hash_input("spl_token_metadata_interface:emitter")]
pub struct Emit {
    /// Start of range of data to emit
    pub start: Option<u64>,
    /// End of range of data to emit
    pub end: Option<u64>,
}

/// All instructions that must be implemented in the token-metadata interface
#[derive(Clone, Debug, PartialEq)]
pub enum TokenMetadataInstruction {
    /// Initializes a TLV entry with the basic token-metadata fields.
    ///
    /// Assumes that the provided mint is an SPL token mint, that the metadata
    /// account is allocated and assigned to the program, and that the metadata
    /// account has enough lamports to cover the rent-exempt reserve.
    ///
    /// Accounts expected by this instruction:
    ///
    ///   0. `[w]` Metadata
    ///   1. `[]` Update authority
    ///   2. `[]` Mint
    ///   3. `[s]` Mint authority
    Initialize(Initialize),

    /// Updates a field in a token-metadata account.
    ///
    /// The field can be one of the required fields (name, symbol, URI), or a
    /// totally new field denoted by a "key" string.
    ///
    /// Accounts expected by this instruction:
    ///
    ///   0. `[w]` Metadata account
    ///   1. `[s]` Update authority
    UpdateField(UpdateField),

    /// Removes a key-value pair in a token-metadata account.
    ///
    /// This only applies to additional fields, and not the base name / symbol /
    /// URI fields.
    ///
    /// Accounts expected by this instruction:
    ///
    ///   0. `[w]` Metadata account
    ///   1. `[s]` Update authority
    RemoveKey(RemoveKey),

    /// Updates the token-metadata authority
    ///
    /// Accounts expected by this instruction:
    ///
    ///   0. `[w]` Metadata account
    ///   1. `[s]` Current update authority
    UpdateAuthority(UpdateAuthority),

    /// Emits the token-metadata as return data
    ///
    /// The format of the data emitted follows exactly the `TokenMetadata`
    /// struct, but it's possible that the account data is stored in another
    /// format by the program.
    ///
    /// With this instruction, a program that implements the token-metadata
    /// interface can return `TokenMetadata` without adhering to the specific
    /// byte layout of the `TokenMetadata` struct in any accounts.
    ///
    /// Accounts expected by this instruction:
    ///
    ///   0. `[]` Metadata account
    Emit(Emit),
}
impl TokenMetadataInstruction {
    /// Unpacks a byte buffer into a
    /// [TokenMetadataInstruction](enum.TokenMetadataInstruction.html)
    pub fn unpack(input: &[u8]) -> Result<Self, ProgramError> {
        if input.len() < ArrayDiscriminator::LENGTH {
            return Err(ProgramError::InvalidInstructionData);
        }
        let (discriminator, rest) = input.split_at(ArrayDiscriminator::LENGTH);
        Ok(match discriminator {
            Initialize::SPL_DISCRIMINATOR_SLICE => {
                let data = Initialize::try_from_slice(rest)?;
                Self::Initialize(data)
            }
            UpdateField::SPL_DISCRIMINATOR_SLICE => {
                let data = UpdateField::try_from_slice(rest)?;
                Self::UpdateField(data)
            }
            RemoveKey::SPL_DISCRIMINATOR_SLICE => {
                let data = RemoveKey::try_from_slice(rest)?;
                Self::RemoveKey(data)
            }
            UpdateAuthority::SPL_DISCRIMINATOR_SLICE => {
                let data = UpdateAuthority::try_from_slice(rest)?;
                Self::UpdateAuthority(data)
            }
            Emit::SPL_DISCRIMINATOR_SLICE => {
                let data = Emit::try_from_slice(rest)?;
                Self::Emit(data)
            }
            _ => return Err(ProgramError::InvalidInstructionData),
        })
    }

    /// Packs a [TokenMetadataInstruction](enum.TokenMetadataInstruction.html)
    /// into a byte buffer
    pub fn pack(&self) -> Vec<u8> {
        let mut buf = vec![];
        match self {
            Self::Initialize(data) => {
                buf.extend_from_slice(Initialize::SPL_DISCRIMINATOR_SLICE);
                buf.append(&mut data.try_to_vec().unwrap());
            }
            Self::UpdateField(data) => {
                buf.extend_from_slice(UpdateField::SPL_DISCRIMINATOR_SLICE);
                buf.append(&mut data.try_to_vec().unwrap());
            }
            Self::RemoveKey(data) => {
                buf.extend_from_slice(RemoveKey::SPL_DISCRIMINATOR_SLICE);
                buf.append(&mut data.try_to_vec().unwrap());
            }
            Self::UpdateAuthority(data) => {
                buf.extend_from_slice(UpdateAuthority::SPL_DISCRIMINATOR_SLICE);
                buf.append(&mut data.try_to_vec().unwrap());
            }
            Self::Emit(data) => {
                buf.extend_from_slice(Emit::SPL_DISCRIMINATOR_SLICE);
                buf.append(&mut data.try_to_vec().unwrap());
            }
        };
        buf
    }
}

/// Creates an `Initialize` instruction
#[allow(clippy::too_many_arguments)]
pub fn initialize(
    program_id: &Pubkey,
    metadata: &Pubkey,
    update_authority: &Pubkey,
    mint: &Pubkey,
    mint_authority: &Pubkey,
    name: String,
    symbol: String,
    uri: String,
) -> Instruction {
    let data = TokenMetadataInstruction::Initialize(Initialize { name, symbol, uri });
    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*metadata, false),
            AccountMeta::new_readonly(*update_authority, false),
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new_readonly(*mint_authority, true),
        ],
        data: data.pack(),
    }
}

/// Creates an `UpdateField` instruction
pub fn update_field(
    program_id: &Pubkey,
    metadata: &Pubkey,
    update_authority: &Pubkey,
    field: Field,
    value: String,
) -> Instruction {
    let data = TokenMetadataInstruction::UpdateField(UpdateField { field, value });
    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*metadata, false),
            AccountMeta::new_readonly(*update_authority, true),
        ],
        data: data.pack(),
    }
}

/// Creates a `RemoveKey` instruction
pub fn remove_key(
    program_id: &Pubkey,
    metadata: &Pubkey,
    update_authority: &Pubkey,
    key: String,
    idempotent: bool,
) -> Instruction {
    let data = TokenMetadataInstruction::RemoveKey(RemoveKey { idempotent, key });
    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*metadata, false),
            AccountMeta::new_readonly(*update_authority, true),
        ],
        data: data.pack(),
    }
}

/// Creates an `UpdateAuthority` instruction
pub fn update_authority(
    program_id: &Pubkey,
    metadata: &Pubkey,
    current_authority: &Pubkey,
    new_authority: OptionalNonZeroPubkey,
) -> Instruction {
    let data = TokenMetadataInstruction::UpdateAuthority(UpdateAuthority { new_authority });
    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*metadata, false),
            AccountMeta::new_readonly(*current_authority, true),
        ],
        data: data.pack(),
    }
}

/// Creates an `Emit` instruction
pub fn emit(
    program_id: &Pubkey,
    metadata: &Pubkey,
    start: Option<u64>,
    end: Option<u64>,
) -> Instruction {
    let data = TokenMetadataInstruction::Emit(Emit { start, end });
    Instruction {
        program_id: *program_id,
        accounts: vec![AccountMeta::new_readonly(*metadata, false)],
        data: data.pack(),
    }
}

#[cfg(test)]
mod test {
    use {super::*, crate::NAMESPACE, solana_program::hash};

    fn instruction_discriminator(name: &str) -> Vec<u8> {
        let preimage = hash::hashv(&[format!("{NAMESPACE}:{name}").as_bytes()]);
        preimage.as_ref()[..ArrayDiscriminator::LENGTH].to_vec()
    }

    fn check_pack_unpack<T: BorshSerialize>(
        instruction: TokenMetadataInstruction,
        discriminator: &[u8],
        data: T,
    ) {
        let mut expect = vec![];
        expect.extend_from_slice(discriminator.as_ref());
        expect.append(&mut data.try_to_vec().unwrap());
        let packed = instruction.pack();
        assert_eq!(packed, expect);
        let unpacked = TokenMetadataInstruction::unpack(&expect).unwrap();
        assert_eq!(unpacked, instruction);
    }

    fn borsh_string(value: &str) -> Vec<u8> {
        let mut buf = (value.len() as u32).to_le_bytes().to_vec();
        buf.extend_from_slice(value.as_bytes());
        buf
    }

    #[test]
    fn initialize_pack() {
        let name = "My test token";
        let symbol = "TEST";
        let uri = "http://test.test";
        let data = Initialize {
            name: name.to_string(),
            symbol: symbol.to_string(),
            uri: uri.to_string(),
        };
        let check = TokenMetadataInstruction::Initialize(data.clone());
        let discriminator = instruction_discriminator("initialize_account");
        check_pack_unpack(check.clone(), &discriminator, data);

        // the three strings are length-prefixed, in declaration order
        let mut expect = discriminator;
        expect.extend_from_slice(&borsh_string(name));
        expect.extend_from_slice(&borsh_string(symbol));
        expect.extend_from_slice(&borsh_string(uri));
        assert_eq!(check.pack(), expect);
    }

    #[test]
    fn update_field_pack() {
        let field = "MyTestField";
        let value = "http://test.uri";
        let data = UpdateField {
            field: Field::from_key(field),
            value: value.to_string(),
        };
        assert_eq!(data.field, Field::Key(field.to_string()));
        let check = TokenMetadataInstruction::UpdateField(data.clone());
        let discriminator = instruction_discriminator("updating_field");
        check_pack_unpack(check.clone(), &discriminator, data);

        // unrecognized keys take the fallback variant, key string preserved
        let mut expect = discriminator;
        expect.push(3);
        expect.extend_from_slice(&borsh_string(field));
        expect.extend_from_slice(&borsh_string(value));
        assert_eq!(check.pack(), expect);
    }

    #[test]
    fn update_field_pack_well_known() {
        let value = "My test token";
        let data = UpdateField {
            field: Field::from_key("Name"),
            value: value.to_string(),
        };
        assert_eq!(data.field, Field::Name);
        let check = TokenMetadataInstruction::UpdateField(data.clone());
        let discriminator = instruction_discriminator("updating_field");
        check_pack_unpack(check.clone(), &discriminator, data);

        // well-known fields encode as a bare variant tag, no string
        let mut expect = discriminator;
        expect.push(0);
        expect.extend_from_slice(&borsh_string(value));
        assert_eq!(check.pack(), expect);
    }

    #[test]
    fn remove_key_pack() {
        let data = RemoveKey {
            idempotent: true,
            key: "MyTestField".to_string(),
        };
        let check = TokenMetadataInstruction::RemoveKey(data.clone());
        let discriminator = instruction_discriminator("remove_key_ix");
        check_pack_unpack(check.clone(), &discriminator, data);

        // idempotent flag is a single byte ahead of the key
        let packed = check.pack();
        assert_eq!(packed[ArrayDiscriminator::LENGTH], 1);
    }

    #[test]
    fn update_authority_pack() {
        let data = UpdateAuthority {
            new_authority: OptionalNonZeroPubkey::default(),
        };
        let check = TokenMetadataInstruction::UpdateAuthority(data.clone());
        let discriminator = instruction_discriminator("update_the_authority");
        check_pack_unpack(check, &discriminator, data);
    }

    #[test]
    fn update_authority_payload_is_raw_pubkey() {
        let program_id = Pubkey::new_unique();
        let metadata = Pubkey::new_unique();
        let new_authority = Pubkey::new_unique();
        let first = update_authority(
            &program_id,
            &metadata,
            &Pubkey::new_unique(),
            OptionalNonZeroPubkey::try_from(Some(new_authority)).unwrap(),
        );
        assert_eq!(
            &first.data[ArrayDiscriminator::LENGTH..],
            &new_authority.to_bytes()[..]
        );

        // the current authority only appears in the account list
        let second = update_authority(
            &program_id,
            &metadata,
            &Pubkey::new_unique(),
            OptionalNonZeroPubkey::try_from(Some(new_authority)).unwrap(),
        );
        assert_eq!(first.data, second.data);
        assert_ne!(first.accounts[1].pubkey, second.accounts[1].pubkey);
    }

    #[test]
    fn emit_pack() {
        let data = Emit {
            start: None,
            end: Some(10),
        };
        let check = TokenMetadataInstruction::Emit(data.clone());
        let discriminator = instruction_discriminator("emitter");
        check_pack_unpack(check, &discriminator, data);
    }

    #[test]
    fn emit_pack_bounds() {
        let data = Emit {
            start: Some(0),
            end: Some(10),
        };
        let check = TokenMetadataInstruction::Emit(data.clone());
        let discriminator = instruction_discriminator("emitter");
        check_pack_unpack(check.clone(), &discriminator, data);

        // presence byte then little-endian value, for each bound
        let mut expect = discriminator;
        expect.push(1);
        expect.extend_from_slice(&0u64.to_le_bytes());
        expect.push(1);
        expect.extend_from_slice(&10u64.to_le_bytes());
        assert_eq!(check.pack(), expect);
    }

    #[test]
    fn emit_pack_no_bounds() {
        let data = Emit {
            start: None,
            end: None,
        };
        let check = TokenMetadataInstruction::Emit(data.clone());
        let discriminator = instruction_discriminator("emitter");
        check_pack_unpack(check.clone(), &discriminator, data);

        let mut expect = discriminator;
        expect.extend_from_slice(&[0, 0]);
        assert_eq!(check.pack(), expect);
    }

    #[test]
    fn unpack_checks_discriminator() {
        assert_eq!(
            TokenMetadataInstruction::unpack(&[0; 4]),
            Err(ProgramError::InvalidInstructionData)
        );
        assert_eq!(
            TokenMetadataInstruction::unpack(&[255; 8]),
            Err(ProgramError::InvalidInstructionData)
        );
    }

    #[test]
    fn unpack_rejects_truncated_string() {
        // length prefix claims more bytes than the payload holds
        let mut input = instruction_discriminator("initialize_account");
        input.extend_from_slice(&1000u32.to_le_bytes());
        input.extend_from_slice(b"trunc");
        assert!(TokenMetadataInstruction::unpack(&input).is_err());
    }

    #[test]
    fn field_from_key() {
        assert_eq!(Field::from_key("Name"), Field::Name);
        assert_eq!(Field::from_key("Symbol"), Field::Symbol);
        assert_eq!(Field::from_key("Uri"), Field::Uri);
        // exact match only
        assert_eq!(Field::from_key("name"), Field::Key("name".to_string()));
        assert_eq!(Field::from_key("URI"), Field::Key("URI".to_string()));
    }
}
