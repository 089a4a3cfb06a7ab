//! AMQP 0-9-1 broker adapter built on `lapin`.

use super::channel::{AckMode, ChannelError, MessageChannel};
use crate::events::{InboundMessage, InboundSender, MessageAcker};
use async_trait::async_trait;
use futures_util::StreamExt;
use lapin::acker::Acker;
use lapin::options::{
    BasicAckOptions, BasicConsumeOptions, BasicPublishOptions, ConfirmSelectOptions,
    ExchangeDeclareOptions, QueueBindOptions, QueueDeclareOptions,
};
use lapin::types::FieldTable;
use lapin::{BasicProperties, Channel, Connection, ConnectionProperties, ExchangeKind};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

const CONTENT_TYPE_JSON: &str = "application/json";
const PERSISTENT: u8 = 2;

pub struct AmqpChannel {
    connection: Connection,
    channel: Channel,
}

struct DeliveryAcker(Acker);

#[async_trait]
impl MessageAcker for DeliveryAcker {
    async fn ack(&self) -> Result<(), ChannelError> {
        self.0.ack(BasicAckOptions::default()).await?;
        Ok(())
    }
}

impl AmqpChannel {
    /// Open a connection and a publisher-confirm channel.
    pub async fn connect(uri: &str) -> Result<Self, ChannelError> {
        let connection = Connection::connect(uri, ConnectionProperties::default()).await?;
        let channel = connection.create_channel().await?;
        channel
            .confirm_select(ConfirmSelectOptions::default())
            .await?;
        info!("Connected to AMQP broker");
        Ok(Self {
            connection,
            channel,
        })
    }

    /// Declare the durable topic exchange and queue and bind them.
    pub async fn declare_topology(
        &self,
        exchange: &str,
        queue: &str,
        binding_key: &str,
    ) -> Result<(), ChannelError> {
        self.channel
            .exchange_declare(
                exchange,
                ExchangeKind::Topic,
                ExchangeDeclareOptions {
                    durable: true,
                    ..Default::default()
                },
                FieldTable::default(),
            )
            .await?;
        self.channel
            .queue_declare(
                queue,
                QueueDeclareOptions {
                    durable: true,
                    ..Default::default()
                },
                FieldTable::default(),
            )
            .await?;
        self.channel
            .queue_bind(
                queue,
                exchange,
                binding_key,
                QueueBindOptions::default(),
                FieldTable::default(),
            )
            .await?;
        info!(exchange, queue, binding_key, "AMQP topology declared");
        Ok(())
    }

    /// Subscribe to `queue` and forward every delivery into `sender`.
    ///
    /// The returned task ends when the broker closes the subscription or the
    /// receiving side of `sender` is dropped. It drops `sender` on exit, which
    /// ends the consumer loop reading from it.
    pub async fn start_consuming(
        &self,
        queue: &str,
        consumer_tag: &str,
        ack_mode: AckMode,
        sender: InboundSender,
    ) -> Result<JoinHandle<()>, ChannelError> {
        let channel = self.connection.create_channel().await?;
        let mut consumer = channel
            .basic_consume(
                queue,
                consumer_tag,
                BasicConsumeOptions {
                    no_ack: ack_mode.is_auto(),
                    ..Default::default()
                },
                FieldTable::default(),
            )
            .await?;
        info!(queue, consumer_tag, ?ack_mode, "AMQP consumer started");

        Ok(tokio::spawn(async move {
            while let Some(delivery) = consumer.next().await {
                let delivery = match delivery {
                    Ok(delivery) => delivery,
                    Err(e) => {
                        error!(error = %e, "AMQP delivery stream failed");
                        break;
                    }
                };
                let routing_key = delivery.routing_key.as_str().to_string();
                debug!(routing_key = %routing_key, "AMQP delivery received");
                let message = match ack_mode {
                    AckMode::Auto => InboundMessage::auto_acked(routing_key, delivery.data),
                    AckMode::Manual => InboundMessage::with_acker(
                        routing_key,
                        delivery.data,
                        Box::new(DeliveryAcker(delivery.acker)),
                    ),
                };
                if sender.send(message).await.is_err() {
                    info!("Inbound receiver dropped, stopping AMQP pump");
                    break;
                }
            }
            info!("AMQP consumer stream ended");
            // Keep the consuming channel alive for as long as the pump runs.
            drop(channel);
        }))
    }

    pub async fn close(&self) -> Result<(), ChannelError> {
        self.connection.close(200, "shutdown").await?;
        Ok(())
    }
}

#[async_trait]
impl MessageChannel for AmqpChannel {
    async fn publish(
        &self,
        exchange: &str,
        routing_key: &str,
        body: Vec<u8>,
    ) -> Result<(), ChannelError> {
        let confirmation = self
            .channel
            .basic_publish(
                exchange,
                routing_key,
                BasicPublishOptions::default(),
                &body,
                BasicProperties::default()
                    .with_content_type(CONTENT_TYPE_JSON.into())
                    .with_delivery_mode(PERSISTENT),
            )
            .await?
            .await?;
        if confirmation.is_nack() {
            return Err(ChannelError::Nacked);
        }
        Ok(())
    }
}
